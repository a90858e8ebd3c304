use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Booking status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Accepted,
    Ongoing,
    Completed,
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BookingStatus::Pending => write!(f, "pending"),
            BookingStatus::Accepted => write!(f, "accepted"),
            BookingStatus::Ongoing => write!(f, "ongoing"),
            BookingStatus::Completed => write!(f, "completed"),
            BookingStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Database model for a booking.
///
/// Coordinates are kept as the text the dispatch back end wrote; they are parsed only
/// when a map is needed.
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: Uuid,
    /// Short human-facing identifier, e.g. `BK-1042`
    pub reference: String,
    pub driver_id: Uuid,
    pub passenger_name: String,
    pub passenger_phone: String,
    pub pickup_location: String,
    pub pickup_lat: String,
    pub pickup_lng: String,
    pub dropoff_location: String,
    pub dropoff_lat: String,
    pub dropoff_lng: String,
    pub scheduled_at: DateTime<Utc>,
    pub distance_km: f64,
    pub duration_minutes: i32,
    pub payment_method: String,
    pub fare: Decimal,
    pub status: BookingStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// `"<pickup> to <dropoff>"`
    pub fn route_label(&self) -> String {
        format!("{} to {}", self.pickup_location, self.dropoff_location)
    }

    /// When the fare was earned: completion time, falling back to the schedule
    pub fn earned_at(&self) -> DateTime<Utc> {
        self.completed_at.unwrap_or(self.scheduled_at)
    }

    pub fn is_completed(&self) -> bool {
        self.status == BookingStatus::Completed
    }
}
