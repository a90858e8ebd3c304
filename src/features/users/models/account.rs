use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::shared::constants::VEHICLE_CATEGORIES;

/// Account status enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "account_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Pending,
    Active,
}

impl std::fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountStatus::Pending => write!(f, "pending"),
            AccountStatus::Active => write!(f, "active"),
        }
    }
}

/// Database model for a driver account (identity and driver profile share the row)
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub name_extension: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub dob: Option<NaiveDate>,
    pub gender: Option<String>,
    pub avatar: Option<String>,
    pub role: String,
    pub status: AccountStatus,
    pub license_number: Option<String>,
    pub license_issue_date: Option<NaiveDate>,
    pub license_expiry_date: Option<NaiveDate>,
    pub license_image: Option<String>,
    pub nbi_clearance: Option<String>,
    pub proof_of_address: Option<String>,
    pub years_experience: Option<i32>,
    pub previous_jobs: Option<String>,
    /// JSON list of vehicle category names
    pub vehicle_categories: String,
    pub total_trips: i32,
    pub rating: Option<Decimal>,
    pub member_since: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Stored vehicle categories; anything undecodable reads as no categories
    pub fn vehicle_category_list(&self) -> Vec<String> {
        serde_json::from_str::<Vec<String>>(&self.vehicle_categories).unwrap_or_default()
    }
}

/// Row inserted by registration
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub id: Uuid,
    pub name: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub name_extension: Option<String>,
    pub email: String,
    pub password_hash: String,
    pub phone: String,
    pub address: String,
    pub dob: NaiveDate,
    pub gender: String,
    pub avatar: String,
    pub role: String,
    pub status: AccountStatus,
    pub license_number: String,
    pub license_expiry_date: NaiveDate,
    pub license_image: Option<String>,
    pub nbi_clearance: Option<String>,
    pub proof_of_address: Option<String>,
    pub member_since: NaiveDate,
}

/// `update_account` payload
#[derive(Debug, Clone, PartialEq)]
pub struct AccountInfoUpdate {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub dob: Option<NaiveDate>,
}

/// `update_driver` payload
#[derive(Debug, Clone, PartialEq)]
pub struct DriverInfoUpdate {
    pub license_number: String,
    pub license_issue_date: Option<NaiveDate>,
    pub license_expiry_date: Option<NaiveDate>,
    pub years_experience: Option<i32>,
    pub previous_jobs: String,
    pub vehicle_categories: Vec<String>,
}

impl DriverInfoUpdate {
    pub fn vehicle_categories_json(&self) -> String {
        serde_json::to_string(&self.vehicle_categories).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Account column holding a single document path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentSlot {
    Avatar,
    LicenseImage,
}

impl DocumentSlot {
    pub fn column(&self) -> &'static str {
        match self {
            DocumentSlot::Avatar => "avatar",
            DocumentSlot::LicenseImage => "license_image",
        }
    }

    pub fn current<'a>(&self, account: &'a Account) -> Option<&'a str> {
        match self {
            DocumentSlot::Avatar => account.avatar.as_deref(),
            DocumentSlot::LicenseImage => account.license_image.as_deref(),
        }
    }
}

/// Normalise submitted vehicle categories: case-insensitive, lowercase, duplicates dropped,
/// first-seen order kept. Returns the first unknown category as the error.
pub fn normalize_vehicle_categories<S: AsRef<str>>(raw: &[S]) -> Result<Vec<String>, String> {
    let mut categories: Vec<String> = Vec::with_capacity(raw.len());
    for value in raw {
        let value = value.as_ref().trim();
        if value.is_empty() {
            continue;
        }
        let lowered = value.to_lowercase();
        if !VEHICLE_CATEGORIES.contains(&lowered.as_str()) {
            return Err(value.to_string());
        }
        if !categories.contains(&lowered) {
            categories.push(lowered);
        }
    }
    Ok(categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_vehicle_categories() {
        let normalized = normalize_vehicle_categories(&["SUV", "sedan", "suv", " van "]).unwrap();
        assert_eq!(normalized, vec!["suv", "sedan", "van"]);

        assert_eq!(normalize_vehicle_categories::<&str>(&[]).unwrap(), Vec::<String>::new());
        assert_eq!(
            normalize_vehicle_categories(&["sedan", "hovercraft"]),
            Err("hovercraft".to_string())
        );
    }

    #[test]
    fn test_vehicle_categories_json() {
        let update = DriverInfoUpdate {
            license_number: "N01".to_string(),
            license_issue_date: None,
            license_expiry_date: None,
            years_experience: None,
            previous_jobs: String::new(),
            vehicle_categories: vec!["sedan".to_string(), "bus".to_string()],
        };
        assert_eq!(update.vehicle_categories_json(), r#"["sedan","bus"]"#);
    }
}
