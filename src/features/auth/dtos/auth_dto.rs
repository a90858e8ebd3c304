use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::auth::model::SessionUser;
use crate::features::users::models::{Account, AccountStatus};

/// Request DTO for login
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequestDto {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,
}

/// Response DTO for login and completed registration
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    pub user: AuthUserDto,
}

/// Account summary returned once a session is established
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub status: AccountStatus,
}

impl From<&Account> for AuthUserDto {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            name: account.name.clone(),
            email: account.email.clone(),
            status: account.status,
        }
    }
}

/// Identity cached in the current session
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<SessionUser> for MeResponseDto {
    fn from(user: SessionUser) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Result of validating an intermediate registration step
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistrationStepDto {
    pub step: u8,
    pub valid: bool,
}

/// Registration form, for OpenAPI documentation only.
/// The handler reads the multipart form directly.
#[derive(Debug, Deserialize, ToSchema)]
#[allow(dead_code)]
#[serde(rename_all = "camelCase")]
pub struct RegisterFormDto {
    /// 1 = credentials, 2 = personal info, 3 = final submit (default)
    #[schema(example = 3)]
    pub step: Option<u8>,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub ext: Option<String>,
    #[schema(example = "driver@example.com")]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[schema(example = "09171234567")]
    pub contact_number: String,
    pub address: String,
    #[schema(example = "1990-04-12")]
    pub birthdate: String,
    pub gender: String,
    pub license_number: String,
    #[schema(example = "2030-04-12")]
    pub license_expiry: String,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub license_photo: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub nbi_clearance: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub proof_of_address: Option<String>,
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub id_picture: Option<String>,
}
