use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::core::error::AppError;
use crate::features::bookings::models::BookingStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum HistoryTab {
    Reports,
    Transactions,
}

impl std::str::FromStr for HistoryTab {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "reports" => Ok(HistoryTab::Reports),
            "transactions" => Ok(HistoryTab::Transactions),
            other => Err(AppError::BadRequest(format!("Unknown history tab: {}", other))),
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct HistoryQuery {
    /// `reports` (default) or `transactions`
    pub tab: Option<String>,
}

/// Row of the reports table
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportRowDto {
    pub id: Uuid,
    #[schema(example = "CMP-0007")]
    pub reference: String,
    pub passenger: String,
    pub complaint_type: String,
    /// First 40 characters, `...` when cut
    pub description: String,
    pub date: String,
}

/// Full complaint shown in the report details view
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ReportDetailDto {
    pub id: Uuid,
    pub reference: String,
    pub passenger: String,
    pub complaint_type: String,
    pub description: String,
    pub route: Option<String>,
    pub date: String,
    pub time: String,
}

/// Row of the transaction history table (completed and cancelled bookings)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TransactionRowDto {
    pub reference: String,
    pub passenger: String,
    pub route: String,
    pub date: String,
    pub payment: String,
    pub fare: String,
    pub status: BookingStatus,
}

/// Only the collection of the requested tab is filled
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponseDto {
    pub tab: HistoryTab,
    pub reports: Vec<ReportRowDto>,
    pub transactions: Vec<TransactionRowDto>,
}
