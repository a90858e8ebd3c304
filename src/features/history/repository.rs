use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::history::models::Complaint;

/// Read access to complaints filed against a driver
#[async_trait]
pub trait ComplaintRepository: Send + Sync {
    /// Newest first
    async fn list_for_driver(&self, driver_id: Uuid) -> Result<Vec<Complaint>>;

    /// A complaint is only visible to the driver it was filed against
    async fn find_for_driver(&self, driver_id: Uuid, id: Uuid) -> Result<Option<Complaint>>;
}

pub struct PgComplaintRepository {
    pool: PgPool,
}

impl PgComplaintRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ComplaintRepository for PgComplaintRepository {
    async fn list_for_driver(&self, driver_id: Uuid) -> Result<Vec<Complaint>> {
        sqlx::query_as::<_, Complaint>(
            r#"
            SELECT *
            FROM complaints
            WHERE driver_id = $1
            ORDER BY filed_at DESC
            "#,
        )
        .bind(driver_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list complaints for driver {}: {:?}", driver_id, e);
            AppError::Database(e)
        })
    }

    async fn find_for_driver(&self, driver_id: Uuid, id: Uuid) -> Result<Option<Complaint>> {
        sqlx::query_as::<_, Complaint>("SELECT * FROM complaints WHERE id = $1 AND driver_id = $2")
            .bind(id)
            .bind(driver_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch complaint {}: {:?}", id, e);
                AppError::Database(e)
            })
    }
}
