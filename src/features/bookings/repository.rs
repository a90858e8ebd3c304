use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::bookings::models::Booking;

/// Read access to the bookings assigned to a driver
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Every booking of the driver, most recently scheduled first
    async fn list_for_driver(&self, driver_id: Uuid) -> Result<Vec<Booking>>;
}

pub struct PgBookingRepository {
    pool: PgPool,
}

impl PgBookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for PgBookingRepository {
    async fn list_for_driver(&self, driver_id: Uuid) -> Result<Vec<Booking>> {
        sqlx::query_as::<_, Booking>(
            r#"
            SELECT *
            FROM bookings
            WHERE driver_id = $1
            ORDER BY scheduled_at DESC, created_at DESC
            "#,
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list bookings for driver {}: {:?}", driver_id, e);
            AppError::Database(e)
        })
    }
}
