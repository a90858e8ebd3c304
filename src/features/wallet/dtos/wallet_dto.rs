use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::error::AppError;

/// Earnings window of the wallet view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum WalletPeriod {
    #[serde(rename = "7days")]
    SevenDays,
    #[serde(rename = "30days")]
    ThirtyDays,
    #[serde(rename = "alltime")]
    AllTime,
}

impl WalletPeriod {
    /// Length of the window in days, `None` for all time
    pub fn days(&self) -> Option<i64> {
        match self {
            WalletPeriod::SevenDays => Some(7),
            WalletPeriod::ThirtyDays => Some(30),
            WalletPeriod::AllTime => None,
        }
    }

    pub fn subtitle(&self) -> &'static str {
        match self {
            WalletPeriod::SevenDays => "Last 7 days of transactions",
            WalletPeriod::ThirtyDays => "Last 30 days of transactions",
            WalletPeriod::AllTime => "All time transactions",
        }
    }
}

impl std::str::FromStr for WalletPeriod {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "7days" => Ok(WalletPeriod::SevenDays),
            "30days" => Ok(WalletPeriod::ThirtyDays),
            "alltime" => Ok(WalletPeriod::AllTime),
            other => Err(AppError::BadRequest(format!("Unknown wallet period: {}", other))),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct WalletQuery {
    /// `7days` (default), `30days` or `alltime`
    pub period: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletSummaryDto {
    pub period: WalletPeriod,
    #[schema(example = "₱2,450.00")]
    pub balance: String,
    pub daily_average: String,
    pub total_transactions: usize,
    pub highest_earning: String,
    #[schema(example = "Last 7 days of transactions")]
    pub subtitle: String,
    pub transactions: Vec<WalletTransactionDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WalletTransactionDto {
    #[schema(example = "Trip Earnings")]
    pub title: String,
    #[schema(example = "Quezon City to Makati")]
    pub route: String,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    #[schema(example = "+ ₱450.00")]
    pub amount: String,
}
