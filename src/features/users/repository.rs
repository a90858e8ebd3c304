//! Account persistence.
//!
//! `AccountRepository` is the seam between services and Postgres; tests swap in the
//! in-memory store from `shared::test_helpers`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::users::models::{
    Account, AccountInfoUpdate, DocumentSlot, DriverInfoUpdate, NewAccount,
};

#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Exact (case-sensitive) email match
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>>;

    async fn email_exists(&self, email: &str) -> Result<bool>;

    async fn insert(&self, account: &NewAccount) -> Result<Account>;

    async fn update_account_info(&self, id: Uuid, update: &AccountInfoUpdate) -> Result<()>;

    async fn update_driver_info(&self, id: Uuid, update: &DriverInfoUpdate) -> Result<()>;

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()>;

    async fn update_document(&self, id: Uuid, slot: DocumentSlot, path: &str) -> Result<()>;
}

pub struct PgAccountRepository {
    pool: PgPool,
}

impl PgAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn ensure_updated(rows_affected: u64, id: Uuid) -> Result<()> {
    if rows_affected == 0 {
        return Err(AppError::NotFound(format!("Account {} not found", id)));
    }
    Ok(())
}

#[async_trait]
impl AccountRepository for PgAccountRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to look up account by email: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Account>> {
        sqlx::query_as::<_, Account>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch account {}: {:?}", id, e);
                AppError::Database(e)
            })
    }

    async fn email_exists(&self, email: &str) -> Result<bool> {
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to check email availability: {:?}", e);
                AppError::Database(e)
            })
    }

    async fn insert(&self, account: &NewAccount) -> Result<Account> {
        let inserted = sqlx::query_as::<_, Account>(
            r#"
            INSERT INTO users (
                id, name, first_name, middle_name, last_name, name_extension,
                email, password_hash, phone, address, dob, gender, avatar,
                role, status, license_number, license_expiry_date,
                license_image, nbi_clearance, proof_of_address, member_since
            ) VALUES (
                $1, $2, $3, $4, $5, $6,
                $7, $8, $9, $10, $11, $12, $13,
                $14, $15, $16, $17,
                $18, $19, $20, $21
            )
            RETURNING *
            "#,
        )
        .bind(account.id)
        .bind(&account.name)
        .bind(&account.first_name)
        .bind(&account.middle_name)
        .bind(&account.last_name)
        .bind(&account.name_extension)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.phone)
        .bind(&account.address)
        .bind(account.dob)
        .bind(&account.gender)
        .bind(&account.avatar)
        .bind(&account.role)
        .bind(account.status)
        .bind(&account.license_number)
        .bind(account.license_expiry_date)
        .bind(&account.license_image)
        .bind(&account.nbi_clearance)
        .bind(&account.proof_of_address)
        .bind(account.member_since)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert account: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!("Account created: id={}, status={}", inserted.id, inserted.status);

        Ok(inserted)
    }

    async fn update_account_info(&self, id: Uuid, update: &AccountInfoUpdate) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET name = $1, email = $2, phone = $3, address = $4, dob = $5, updated_at = NOW()
            WHERE id = $6
            "#,
        )
        .bind(&update.name)
        .bind(&update.email)
        .bind(&update.phone)
        .bind(&update.address)
        .bind(update.dob)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update account info for {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        ensure_updated(result.rows_affected(), id)
    }

    async fn update_driver_info(&self, id: Uuid, update: &DriverInfoUpdate) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET license_number = $1, license_issue_date = $2, license_expiry_date = $3,
                years_experience = $4, previous_jobs = $5, vehicle_categories = $6,
                updated_at = NOW()
            WHERE id = $7
            "#,
        )
        .bind(&update.license_number)
        .bind(update.license_issue_date)
        .bind(update.license_expiry_date)
        .bind(update.years_experience)
        .bind(&update.previous_jobs)
        .bind(update.vehicle_categories_json())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to update driver info for {}: {:?}", id, e);
            AppError::Database(e)
        })?;

        ensure_updated(result.rows_affected(), id)
    }

    async fn update_password(&self, id: Uuid, password_hash: &str) -> Result<()> {
        let result =
            sqlx::query("UPDATE users SET password_hash = $1, updated_at = NOW() WHERE id = $2")
                .bind(password_hash)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(|e| {
                    tracing::error!("Failed to update password for {}: {:?}", id, e);
                    AppError::Database(e)
                })?;

        ensure_updated(result.rows_affected(), id)
    }

    async fn update_document(&self, id: Uuid, slot: DocumentSlot, path: &str) -> Result<()> {
        // column name comes from a closed enum, never from input
        let sql = format!(
            "UPDATE users SET {} = $1, updated_at = NOW() WHERE id = $2",
            slot.column()
        );

        let result = sqlx::query(&sql)
            .bind(path)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to update {} for {}: {:?}", slot.column(), id, e);
                AppError::Database(e)
            })?;

        ensure_updated(result.rows_affected(), id)
    }
}
