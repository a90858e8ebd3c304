use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Complaint a passenger filed against a driver
#[derive(Debug, Clone, FromRow)]
pub struct Complaint {
    pub id: Uuid,
    /// Human-facing identifier, e.g. `CMP-0007`
    pub reference: String,
    pub driver_id: Uuid,
    pub booking_id: Option<Uuid>,
    pub passenger_name: String,
    pub complaint_type: String,
    pub description: String,
    /// Route of the trip the complaint is about, when known
    pub route: Option<String>,
    pub filed_at: DateTime<Utc>,
}
