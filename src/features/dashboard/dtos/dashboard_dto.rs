use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::bookings::models::BookingStatus;

/// Everything the driver dashboard shows
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardOverviewDto {
    pub stats: BookingStatsDto,
    pub income: IncomeSummaryDto,
    pub recent_bookings: Vec<RecentBookingDto>,
}

/// Booking counts by lifecycle bucket
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookingStatsDto {
    /// Accepted plus ongoing
    pub ongoing: i64,
    pub completed: i64,
    pub cancelled: i64,
}

/// Income from completed bookings, formatted as money labels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IncomeSummaryDto {
    #[schema(example = "₱12,450.00")]
    pub total: String,
    pub today: String,
    /// ISO week, Monday start
    pub this_week: String,
    pub this_month: String,
    /// Total income over distinct earning days
    pub daily_average: String,
}

/// One row of the recent bookings table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct RecentBookingDto {
    #[schema(example = "BK-1042")]
    pub reference: String,
    pub passenger: String,
    #[schema(example = "SM Megamall to NAIA Terminal 3")]
    pub route: String,
    /// `YYYY-MM-DD`
    pub date: String,
    pub fare: String,
    pub status: BookingStatus,
}
