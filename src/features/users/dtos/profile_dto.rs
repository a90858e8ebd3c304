use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::users::models::{Account, AccountStatus};
use crate::shared::constants::{DEFAULT_AVATAR_PATH, SAMPLE_LICENSE_PATH};
use crate::shared::format::{iso_date, long_date, month_year, short_date};

/// Driver profile as shown on the profile page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponseDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    /// `MM/DD/YYYY`
    pub dob: Option<String>,
    /// `YYYY-MM-DD`, for date inputs
    pub dob_value: Option<String>,
    pub gender: Option<String>,
    pub avatar: String,
    pub role: String,
    pub status: AccountStatus,
    /// `Mon YYYY`
    pub member_since: String,
    pub total_trips: i32,
    pub rating: Option<String>,
    pub driver: DriverProfileDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DriverProfileDto {
    pub license_number: Option<String>,
    /// `MM/DD/YY`
    pub issue_date: Option<String>,
    /// `MM/DD/YY`
    pub expiry_date: Option<String>,
    pub years_experience: Option<i32>,
    pub previous_jobs: Option<String>,
    pub vehicle_categories: Vec<String>,
    /// Stored license image, or the bundled sample when none was uploaded
    pub license_display: String,
}

impl From<&Account> for ProfileResponseDto {
    fn from(account: &Account) -> Self {
        let member_since = account
            .member_since
            .unwrap_or_else(|| account.created_at.date_naive());

        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            phone: account.phone.clone(),
            address: account.address.clone(),
            dob: account.dob.map(long_date),
            dob_value: account.dob.map(iso_date),
            gender: account.gender.clone(),
            avatar: account
                .avatar
                .clone()
                .filter(|path| !path.is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR_PATH.to_string()),
            role: account.role.clone(),
            status: account.status,
            member_since: month_year(member_since),
            total_trips: account.total_trips,
            rating: account.rating.map(|r| format!("{:.1}", r)),
            driver: DriverProfileDto {
                license_number: account.license_number.clone(),
                issue_date: account.license_issue_date.map(short_date),
                expiry_date: account.license_expiry_date.map(short_date),
                years_experience: account.years_experience,
                previous_jobs: account.previous_jobs.clone(),
                vehicle_categories: account.vehicle_category_list(),
                license_display: account
                    .license_image
                    .clone()
                    .filter(|path| !path.is_empty())
                    .unwrap_or_else(|| SAMPLE_LICENSE_PATH.to_string()),
            },
        }
    }
}

/// Result of a profile action
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileActionResponseDto {
    pub action: String,
    /// Public path of the stored file, for upload actions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// Profile action form, for OpenAPI documentation only.
/// The handler reads the multipart form directly; which fields apply depends on `action`.
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
#[serde(rename_all = "camelCase")]
pub struct ProfileActionFormDto {
    /// update_account | update_driver | change_password | upload_avatar | upload_license
    #[schema(example = "update_account")]
    pub action: String,
    pub username: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub dob: Option<String>,
    pub license_number: Option<String>,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    pub years_experience: Option<String>,
    pub previous_jobs: Option<String>,
    /// Repeated field
    pub vehicle_capability: Option<Vec<String>>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
    pub confirm_password: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub avatar_image: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub license_image: Option<String>,
}
