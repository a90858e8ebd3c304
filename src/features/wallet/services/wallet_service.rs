use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::features::bookings::models::Booking;
use crate::features::bookings::BookingRepository;
use crate::features::wallet::dtos::{WalletPeriod, WalletSummaryDto, WalletTransactionDto};
use crate::shared::format::{clock_time, format_money, iso_date};

const TRANSACTION_TITLE: &str = "Trip Earnings";

pub struct WalletService {
    bookings: Arc<dyn BookingRepository>,
}

impl WalletService {
    pub fn new(bookings: Arc<dyn BookingRepository>) -> Self {
        Self { bookings }
    }

    pub async fn get_summary(&self, driver_id: Uuid, period: WalletPeriod) -> WalletSummaryDto {
        let bookings = match self.bookings.list_for_driver(driver_id).await {
            Ok(bookings) => bookings,
            Err(e) => {
                tracing::warn!("Wallet falling back to empty figures for driver {}: {}", driver_id, e);
                Vec::new()
            }
        };

        summarize(&bookings, period, Utc::now())
    }
}

pub fn summarize(bookings: &[Booking], period: WalletPeriod, now: DateTime<Utc>) -> WalletSummaryDto {
    let since = period.days().map(|days| now - Duration::days(days));

    let mut earnings: Vec<&Booking> = bookings
        .iter()
        .filter(|b| b.is_completed())
        .filter(|b| since.is_none_or(|since| b.earned_at() > since))
        .collect();
    earnings.sort_by(|a, b| b.earned_at().cmp(&a.earned_at()));

    let balance: Decimal = earnings.iter().map(|b| b.fare).sum();
    let highest = earnings.iter().map(|b| b.fare).max().unwrap_or(Decimal::ZERO);

    let days = match period.days() {
        Some(days) => days as u64,
        None => earnings
            .iter()
            .map(|b| b.earned_at().date_naive())
            .collect::<HashSet<NaiveDate>>()
            .len() as u64,
    };
    let daily_average = if days == 0 {
        Decimal::ZERO
    } else {
        balance / Decimal::from(days)
    };

    let transactions = earnings
        .iter()
        .map(|b| WalletTransactionDto {
            title: TRANSACTION_TITLE.to_string(),
            route: b.route_label(),
            date: iso_date(b.earned_at().date_naive()),
            time: clock_time(b.earned_at()),
            amount: format!("+ {}", format_money(b.fare)),
        })
        .collect();

    WalletSummaryDto {
        period,
        balance: format_money(balance),
        daily_average: format_money(daily_average),
        total_transactions: earnings.len(),
        highest_earning: format_money(highest),
        subtitle: period.subtitle().to_string(),
        transactions,
    }
}
