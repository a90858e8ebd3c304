//! Driver self-registration.
//!
//! The form is submitted in three steps; steps 1 and 2 only validate, step 3 writes the
//! documents, inserts the account and signs the new driver in. Documents written for an
//! insert that then fails are removed again.

use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::ValidateEmail;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, AuthUserDto};
use crate::features::auth::model::SessionUser;
use crate::features::auth::password::hash_password;
use crate::features::auth::session_store::SessionStore;
use crate::features::users::models::{AccountStatus, NewAccount};
use crate::features::users::repository::AccountRepository;
use crate::modules::storage::upload_policy::{
    is_image_type_allowed, stored_extension, INVALID_IMAGE_TYPE_MESSAGE,
};
use crate::modules::storage::{DocumentFolder, LocalStorage, StoredFile};
use crate::shared::constants::{DEFAULT_AVATAR_PATH, MIN_PASSWORD_LENGTH, ROLE_DRIVER};
use crate::shared::format::parse_flexible_date;
use crate::shared::multipart::{FormData, UploadedFile};

pub const REGISTRATION_FAILED_MESSAGE: &str = "Registration failed. Please try again.";

const REQUIRED_FIELDS: [&str; 10] = [
    "firstName",
    "lastName",
    "email",
    "password",
    "contactNumber",
    "address",
    "birthdate",
    "gender",
    "licenseNumber",
    "licenseExpiry",
];

const CREDENTIAL_FIELDS: [&str; 4] = ["firstName", "lastName", "email", "password"];

const PERSONAL_FIELDS: [&str; 4] = ["birthdate", "gender", "address", "contactNumber"];

const LICENSE_PHOTO: &str = "licensePhoto";
const NBI_CLEARANCE: &str = "nbiClearance";
const PROOF_OF_ADDRESS: &str = "proofOfAddress";
const ID_PICTURE: &str = "idPicture";

const DOCUMENT_FIELDS: [&str; 4] = [LICENSE_PHOTO, NBI_CLEARANCE, PROOF_OF_ADDRESS, ID_PICTURE];

#[derive(Debug)]
pub enum RegistrationOutcome {
    /// An intermediate step passed validation; nothing was persisted
    StepValidated(u8),
    Registered {
        session: SessionUser,
        response: AuthResponseDto,
    },
}

fn require<'a>(form: &'a FormData, field: &str) -> Result<&'a str> {
    let value = form.trimmed(field);
    if value.is_empty() {
        return Err(AppError::Validation(format!("Field '{}' is required", field)));
    }
    Ok(value)
}

fn optional(form: &FormData, field: &str) -> Option<String> {
    Some(form.trimmed(field))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn check_email(email: &str) -> Result<()> {
    if !email.validate_email() {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }
    Ok(())
}

fn check_password_length(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

fn check_passwords_match(password: &str, confirm: &str) -> Result<()> {
    if password != confirm {
        return Err(AppError::Validation("Passwords do not match".to_string()));
    }
    Ok(())
}

fn parse_date_field(form: &FormData, field: &str, label: &str) -> Result<NaiveDate> {
    parse_flexible_date(form.trimmed(field))
        .ok_or_else(|| AppError::Validation(format!("Invalid {}", label)))
}

fn parse_step(raw: Option<&str>) -> Result<u8> {
    match raw.map(str::trim) {
        None | Some("") => Ok(3),
        Some(value) => value
            .parse::<u8>()
            .ok()
            .filter(|step| (1..=3).contains(step))
            .ok_or_else(|| AppError::BadRequest("Unknown registration step".to_string())),
    }
}

/// Step 1: names and credentials
fn validate_credentials(form: &FormData) -> Result<()> {
    for field in CREDENTIAL_FIELDS {
        require(form, field)?;
    }
    check_email(form.trimmed("email"))?;

    let password = form.text("password").unwrap_or("");
    check_passwords_match(password, form.text("confirmPassword").unwrap_or(""))?;
    check_password_length(password)
}

/// Step 2: personal information
fn validate_personal(form: &FormData) -> Result<()> {
    for field in PERSONAL_FIELDS {
        require(form, field)?;
    }
    parse_date_field(form, "birthdate", "birthdate").map(|_| ())
}

/// Validated final submission
#[derive(Debug, Clone)]
struct RegistrationDetails {
    first_name: String,
    middle_name: Option<String>,
    last_name: String,
    name_extension: Option<String>,
    email: String,
    password: String,
    phone: String,
    address: String,
    dob: NaiveDate,
    gender: String,
    license_number: String,
    license_expiry: NaiveDate,
}

impl RegistrationDetails {
    fn from_form(form: &FormData) -> Result<Self> {
        for field in REQUIRED_FIELDS {
            require(form, field)?;
        }

        let email = form.trimmed("email").to_string();
        check_email(&email)?;

        let password = form.text("password").unwrap_or("").to_string();
        check_password_length(&password)?;
        check_passwords_match(&password, form.text("confirmPassword").unwrap_or(""))?;

        Ok(Self {
            first_name: form.trimmed("firstName").to_string(),
            middle_name: optional(form, "middleName"),
            last_name: form.trimmed("lastName").to_string(),
            name_extension: optional(form, "ext"),
            email,
            password,
            phone: form.trimmed("contactNumber").to_string(),
            address: form.trimmed("address").to_string(),
            dob: parse_date_field(form, "birthdate", "birthdate")?,
            gender: form.trimmed("gender").to_string(),
            license_number: form.trimmed("licenseNumber").to_string(),
            license_expiry: parse_date_field(form, "licenseExpiry", "license expiry date")?,
        })
    }

    /// `first middle last ext`, blanks collapsed
    fn display_name(&self) -> String {
        [
            Some(self.first_name.as_str()),
            self.middle_name.as_deref(),
            Some(self.last_name.as_str()),
            self.name_extension.as_deref(),
        ]
        .into_iter()
        .flatten()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
    }
}

pub struct RegistrationService {
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<SessionStore>,
    storage: Arc<LocalStorage>,
}

impl RegistrationService {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        sessions: Arc<SessionStore>,
        storage: Arc<LocalStorage>,
    ) -> Self {
        Self {
            accounts,
            sessions,
            storage,
        }
    }

    pub async fn submit(&self, form: FormData) -> Result<RegistrationOutcome> {
        match parse_step(form.text("step"))? {
            1 => {
                validate_credentials(&form)?;
                Ok(RegistrationOutcome::StepValidated(1))
            }
            2 => {
                validate_personal(&form)?;
                Ok(RegistrationOutcome::StepValidated(2))
            }
            _ => self.register(form).await,
        }
    }

    async fn register(&self, mut form: FormData) -> Result<RegistrationOutcome> {
        let details = RegistrationDetails::from_form(&form)?;

        if self.accounts.email_exists(&details.email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        // every document is type-checked before any is written
        let mut documents: Vec<(&'static str, UploadedFile)> = Vec::new();
        for field in DOCUMENT_FIELDS {
            if let Some(file) = form.take_file(field) {
                if !is_image_type_allowed(&file.content_type) {
                    return Err(AppError::Validation(INVALID_IMAGE_TYPE_MESSAGE.to_string()));
                }
                documents.push((field, file));
            }
        }

        let password_hash = hash_password(&details.password).await?;
        let account_id = Uuid::now_v7();
        let owner = account_id.to_string();

        let mut stored: HashMap<&'static str, StoredFile> = HashMap::new();
        for (field, file) in &documents {
            let extension = stored_extension(&file.file_name, &file.content_type);
            match self
                .storage
                .store(DocumentFolder::Registration, field, &owner, &extension, &file.data)
                .await
            {
                Ok(file) => {
                    stored.insert(*field, file);
                }
                Err(e) => {
                    tracing::error!("Failed to store registration document {}: {}", field, e);
                    self.discard_all(&stored).await;
                    return Err(AppError::OperationFailed(
                        REGISTRATION_FAILED_MESSAGE.to_string(),
                    ));
                }
            }
        }

        let path_of = |field: &str| stored.get(field).map(|file| file.public_path.clone());
        let new_account = NewAccount {
            id: account_id,
            name: details.display_name(),
            first_name: details.first_name.clone(),
            middle_name: details.middle_name.clone(),
            last_name: details.last_name.clone(),
            name_extension: details.name_extension.clone(),
            email: details.email.clone(),
            password_hash,
            phone: details.phone.clone(),
            address: details.address.clone(),
            dob: details.dob,
            gender: details.gender.clone(),
            avatar: path_of(ID_PICTURE).unwrap_or_else(|| DEFAULT_AVATAR_PATH.to_string()),
            role: ROLE_DRIVER.to_string(),
            status: AccountStatus::Pending,
            license_number: details.license_number.clone(),
            license_expiry_date: details.license_expiry,
            license_image: path_of(LICENSE_PHOTO),
            nbi_clearance: path_of(NBI_CLEARANCE),
            proof_of_address: path_of(PROOF_OF_ADDRESS),
            member_since: Utc::now().date_naive(),
        };

        let account = match self.accounts.insert(&new_account).await {
            Ok(account) => account,
            Err(e) => {
                tracing::error!(
                    "Registration insert failed, removing {} stored documents: {}",
                    stored.len(),
                    e
                );
                self.discard_all(&stored).await;
                return Err(AppError::OperationFailed(
                    REGISTRATION_FAILED_MESSAGE.to_string(),
                ));
            }
        };

        let session = self
            .sessions
            .create(account.id, &account.name, &account.email)
            .await;

        tracing::info!(
            "Driver registered: id={}, documents={}",
            account.id,
            stored.len()
        );

        Ok(RegistrationOutcome::Registered {
            session,
            response: AuthResponseDto {
                user: AuthUserDto::from(&account),
            },
        })
    }

    async fn discard_all(&self, stored: &HashMap<&'static str, StoredFile>) {
        for file in stored.values() {
            self.storage.discard(file).await;
        }
    }
}
