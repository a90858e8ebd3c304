use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::bookings::models::{Booking, BookingStatus};
use crate::features::bookings::BookingRepository;
use crate::features::history::dtos::{
    HistoryResponseDto, HistoryTab, ReportDetailDto, ReportRowDto, TransactionRowDto,
};
use crate::features::history::models::Complaint;
use crate::features::history::ComplaintRepository;
use crate::shared::constants::COMPLAINT_PREVIEW_CHARS;
use crate::shared::format::{clock_time, format_money, iso_date, truncate_chars};

pub struct HistoryService {
    complaints: Arc<dyn ComplaintRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl HistoryService {
    pub fn new(complaints: Arc<dyn ComplaintRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self {
            complaints,
            bookings,
        }
    }

    /// One tab of the compliance history. Store failures degrade to an empty tab.
    pub async fn get_tab(&self, driver_id: Uuid, tab: HistoryTab) -> HistoryResponseDto {
        let mut response = HistoryResponseDto {
            tab,
            reports: Vec::new(),
            transactions: Vec::new(),
        };

        match tab {
            HistoryTab::Reports => match self.complaints.list_for_driver(driver_id).await {
                Ok(complaints) => {
                    response.reports = complaints.iter().map(report_row).collect();
                }
                Err(e) => {
                    tracing::warn!("Reports unavailable for driver {}: {}", driver_id, e);
                }
            },
            HistoryTab::Transactions => match self.bookings.list_for_driver(driver_id).await {
                Ok(bookings) => {
                    response.transactions = bookings
                        .iter()
                        .filter(|b| {
                            matches!(b.status, BookingStatus::Completed | BookingStatus::Cancelled)
                        })
                        .map(transaction_row)
                        .collect();
                }
                Err(e) => {
                    tracing::warn!("Transactions unavailable for driver {}: {}", driver_id, e);
                }
            },
        }

        response
    }

    pub async fn get_report(&self, driver_id: Uuid, id: Uuid) -> Result<ReportDetailDto> {
        let complaint = self
            .complaints
            .find_for_driver(driver_id, id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Report {} not found", id)))?;

        Ok(ReportDetailDto {
            id: complaint.id,
            reference: complaint.reference,
            passenger: complaint.passenger_name,
            complaint_type: complaint.complaint_type,
            description: complaint.description,
            route: complaint.route,
            date: iso_date(complaint.filed_at.date_naive()),
            time: clock_time(complaint.filed_at),
        })
    }
}

fn report_row(complaint: &Complaint) -> ReportRowDto {
    ReportRowDto {
        id: complaint.id,
        reference: complaint.reference.clone(),
        passenger: complaint.passenger_name.clone(),
        complaint_type: complaint.complaint_type.clone(),
        description: truncate_chars(&complaint.description, COMPLAINT_PREVIEW_CHARS),
        date: iso_date(complaint.filed_at.date_naive()),
    }
}

fn transaction_row(booking: &Booking) -> TransactionRowDto {
    TransactionRowDto {
        reference: booking.reference.clone(),
        passenger: booking.passenger_name.clone(),
        route: booking.route_label(),
        date: iso_date(booking.scheduled_at.date_naive()),
        payment: booking.payment_method.clone(),
        fare: format_money(booking.fare),
        status: booking.status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{sample_booking, InMemoryBookings, InMemoryComplaints};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    const LATE_ARRIVAL: &str = "Bus arrived 20 minutes late. This caused me to miss an important meeting.";

    fn complaint(driver_id: Uuid, reference: &str, filed_at: DateTime<Utc>) -> Complaint {
        Complaint {
            id: Uuid::now_v7(),
            reference: reference.to_string(),
            driver_id,
            booking_id: None,
            passenger_name: "Maria Santos".to_string(),
            complaint_type: "Late Arrival".to_string(),
            description: LATE_ARRIVAL.to_string(),
            route: Some("Metro Manila to Quezon City".to_string()),
            filed_at,
        }
    }

    fn service(complaints: InMemoryComplaints, bookings: InMemoryBookings) -> HistoryService {
        HistoryService::new(Arc::new(complaints), Arc::new(bookings))
    }

    #[tokio::test]
    async fn test_reports_are_truncated_newest_first() {
        let driver = Uuid::now_v7();
        let filed = Utc.with_ymd_and_hms(2025, 9, 15, 14, 30, 0).unwrap();
        let complaints = InMemoryComplaints::with_complaints(vec![
            complaint(driver, "CMP-0001", filed - Duration::days(3)),
            complaint(driver, "CMP-0002", filed),
            complaint(Uuid::now_v7(), "CMP-9999", filed),
        ]);
        let service = service(complaints, InMemoryBookings::default());

        let history = service.get_tab(driver, HistoryTab::Reports).await;

        assert!(history.transactions.is_empty());
        assert_eq!(history.reports.len(), 2);
        assert_eq!(history.reports[0].reference, "CMP-0002");
        assert_eq!(history.reports[0].date, "2025-09-15");
        assert_eq!(
            history.reports[0].description,
            "Bus arrived 20 minutes late. This caused..."
        );
    }

    #[tokio::test]
    async fn test_report_detail_is_scoped_to_driver() {
        let driver = Uuid::now_v7();
        let filed = Utc.with_ymd_and_hms(2025, 9, 15, 14, 30, 0).unwrap();
        let mine = complaint(driver, "CMP-0001", filed);
        let theirs = complaint(Uuid::now_v7(), "CMP-0002", filed);
        let (mine_id, theirs_id) = (mine.id, theirs.id);
        let service = service(
            InMemoryComplaints::with_complaints(vec![mine, theirs]),
            InMemoryBookings::default(),
        );

        let detail = service.get_report(driver, mine_id).await.unwrap();
        assert_eq!(detail.description, LATE_ARRIVAL);
        assert_eq!(detail.time, "14:30");
        assert_eq!(detail.route.as_deref(), Some("Metro Manila to Quezon City"));

        let err = service.get_report(driver, theirs_id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_transactions_keep_finished_bookings() {
        let driver = Uuid::now_v7();
        let now = Utc.with_ymd_and_hms(2025, 9, 15, 8, 30, 0).unwrap();
        let bookings = InMemoryBookings::with_bookings(vec![
            sample_booking(driver, "BK-1", BookingStatus::Completed, "126", now),
            sample_booking(driver, "BK-2", BookingStatus::Cancelled, "300", now - Duration::hours(1)),
            sample_booking(driver, "BK-3", BookingStatus::Pending, "90", now),
            sample_booking(driver, "BK-4", BookingStatus::Accepted, "90", now),
        ]);
        let service = service(InMemoryComplaints::default(), bookings);

        let history = service.get_tab(driver, HistoryTab::Transactions).await;

        let references: Vec<&str> = history
            .transactions
            .iter()
            .map(|t| t.reference.as_str())
            .collect();
        assert_eq!(references, vec!["BK-1", "BK-2"]);
        assert_eq!(history.transactions[0].fare, "₱126.00");
        assert_eq!(history.transactions[1].status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_store_failure_yields_empty_tab() {
        let complaints = InMemoryComplaints::default();
        complaints.fail_reads(true);
        let bookings = InMemoryBookings::default();
        bookings.fail_reads(true);
        let service = service(complaints, bookings);
        let driver = Uuid::now_v7();

        assert!(service.get_tab(driver, HistoryTab::Reports).await.reports.is_empty());
        assert!(service
            .get_tab(driver, HistoryTab::Transactions)
            .await
            .transactions
            .is_empty());
    }
}
