use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::features::bookings::models::{Booking, BookingStatus};
use crate::features::bookings::BookingRepository;
use crate::features::dashboard::dtos::{
    BookingStatsDto, DashboardOverviewDto, IncomeSummaryDto, RecentBookingDto,
};
use crate::shared::constants::RECENT_BOOKINGS_LIMIT;
use crate::shared::format::{format_money, iso_date};

pub struct DashboardService {
    bookings: Arc<dyn BookingRepository>,
}

impl DashboardService {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    /// Dashboard for one driver. A failing booking store degrades to an empty dashboard.
    pub async fn get_overview(&self, driver_id: Uuid) -> DashboardOverviewDto {
        let bookings = match self.bookings.list_for_driver(driver_id).await {
            Ok(bookings) => bookings,
            Err(e) => {
                tracing::warn!(
                    "Dashboard falling back to empty figures for driver {}: {}",
                    driver_id,
                    e
                );
                Vec::new()
            }
        };

        summarize(&bookings, Utc::now())
    }
}

fn same_iso_week(a: NaiveDate, b: NaiveDate) -> bool {
    a.iso_week() == b.iso_week()
}

fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn summarize(bookings: &[Booking], now: DateTime<Utc>) -> DashboardOverviewDto {
    let today = now.date_naive();

    let mut stats = BookingStatsDto::default();
    let mut total = Decimal::ZERO;
    let mut today_income = Decimal::ZERO;
    let mut week_income = Decimal::ZERO;
    let mut month_income = Decimal::ZERO;
    let mut earning_days: HashSet<NaiveDate> = HashSet::new();

    for booking in bookings {
        match booking.status {
            BookingStatus::Accepted | BookingStatus::Ongoing => stats.ongoing += 1,
            BookingStatus::Completed => stats.completed += 1,
            BookingStatus::Cancelled => stats.cancelled += 1,
            BookingStatus::Pending => {}
        }

        if !booking.is_completed() {
            continue;
        }

        let earned_on = booking.earned_at().date_naive();
        total += booking.fare;
        earning_days.insert(earned_on);
        if earned_on == today {
            today_income += booking.fare;
        }
        if same_iso_week(earned_on, today) {
            week_income += booking.fare;
        }
        if same_month(earned_on, today) {
            month_income += booking.fare;
        }
    }

    let daily_average = if earning_days.is_empty() {
        Decimal::ZERO
    } else {
        total / Decimal::from(earning_days.len() as u64)
    };

    let mut recent: Vec<&Booking> = bookings.iter().collect();
    recent.sort_by(|a, b| b.scheduled_at.cmp(&a.scheduled_at));
    let recent_bookings = recent
        .into_iter()
        .take(RECENT_BOOKINGS_LIMIT)
        .map(|booking| RecentBookingDto {
            reference: booking.reference.clone(),
            passenger: booking.passenger_name.clone(),
            route: booking.route_label(),
            date: iso_date(booking.scheduled_at.date_naive()),
            fare: format_money(booking.fare),
            status: booking.status,
        })
        .collect();

    DashboardOverviewDto {
        stats,
        income: IncomeSummaryDto {
            total: format_money(total),
            today: format_money(today_income),
            this_week: format_money(week_income),
            this_month: format_money(month_income),
            daily_average: format_money(daily_average),
        },
        recent_bookings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::test_helpers::{sample_booking, InMemoryBookings};
    use chrono::{Duration, TimeZone};

    fn at(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_counts_by_bucket() {
        let driver = Uuid::now_v7();
        let now = at(2025, 6, 18, 12);
        let bookings = vec![
            sample_booking(driver, "BK-1", BookingStatus::Pending, "100", now),
            sample_booking(driver, "BK-2", BookingStatus::Accepted, "100", now),
            sample_booking(driver, "BK-3", BookingStatus::Ongoing, "100", now),
            sample_booking(driver, "BK-4", BookingStatus::Completed, "100", now),
            sample_booking(driver, "BK-5", BookingStatus::Cancelled, "100", now),
            sample_booking(driver, "BK-6", BookingStatus::Cancelled, "100", now),
        ];

        let overview = summarize(&bookings, now);

        assert_eq!(
            overview.stats,
            BookingStatsDto {
                ongoing: 2,
                completed: 1,
                cancelled: 2,
            }
        );
    }

    #[test]
    fn test_income_periods() {
        let driver = Uuid::now_v7();
        // Wednesday
        let now = at(2025, 6, 18, 12);
        let bookings = vec![
            sample_booking(driver, "BK-1", BookingStatus::Completed, "450", now),
            // Monday of the same ISO week
            sample_booking(driver, "BK-2", BookingStatus::Completed, "1000", at(2025, 6, 16, 9)),
            // previous week, same month
            sample_booking(driver, "BK-3", BookingStatus::Completed, "50.50", at(2025, 6, 2, 9)),
            // previous month
            sample_booking(driver, "BK-4", BookingStatus::Completed, "99.50", at(2025, 5, 30, 9)),
            // not completed, never income
            sample_booking(driver, "BK-5", BookingStatus::Cancelled, "5000", now),
        ];

        let income = summarize(&bookings, now).income;

        assert_eq!(income.total, "₱1,600.00");
        assert_eq!(income.today, "₱450.00");
        assert_eq!(income.this_week, "₱1,450.00");
        assert_eq!(income.this_month, "₱1,500.50");
        assert_eq!(income.daily_average, "₱400.00");
    }

    #[test]
    fn test_recent_bookings_newest_first_and_capped() {
        let driver = Uuid::now_v7();
        let now = at(2025, 6, 18, 12);
        let bookings: Vec<Booking> = (0..12)
            .map(|i| {
                sample_booking(
                    driver,
                    &format!("BK-{}", i),
                    BookingStatus::Completed,
                    "100",
                    now - Duration::days(i),
                )
            })
            .rev()
            .collect();

        let recent = summarize(&bookings, now).recent_bookings;

        assert_eq!(recent.len(), RECENT_BOOKINGS_LIMIT);
        assert_eq!(recent[0].reference, "BK-0");
        assert_eq!(recent[0].date, "2025-06-18");
        assert_eq!(recent[0].fare, "₱100.00");
        assert!(recent[0].route.contains(" to "));
        assert_eq!(recent[9].reference, "BK-9");
    }

    #[tokio::test]
    async fn test_store_failure_yields_zeroes() {
        let bookings = InMemoryBookings::default();
        bookings.fail_reads(true);
        let service = DashboardService::new(Arc::new(bookings));

        let overview = service.get_overview(Uuid::now_v7()).await;

        assert_eq!(overview.stats, BookingStatsDto::default());
        assert_eq!(overview.income.total, "₱0.00");
        assert_eq!(overview.income.daily_average, "₱0.00");
        assert!(overview.recent_bookings.is_empty());
    }
}
