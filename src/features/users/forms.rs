//! Maps the multipart profile form onto typed profile actions.

use crate::core::error::{AppError, Result};
use crate::features::users::models::{
    normalize_vehicle_categories, AccountInfoUpdate, DriverInfoUpdate,
};
use crate::shared::format::parse_flexible_date;
use crate::shared::multipart::{FormData, UploadedFile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordChange {
    pub current: String,
    pub new: String,
    pub confirm: String,
}

#[derive(Debug)]
pub enum ProfileAction {
    UpdateAccount(AccountInfoUpdate),
    UpdateDriver(DriverInfoUpdate),
    ChangePassword(PasswordChange),
    UploadAvatar(UploadedFile),
    UploadLicense(UploadedFile),
}

impl ProfileAction {
    pub fn name(&self) -> &'static str {
        match self {
            ProfileAction::UpdateAccount(_) => "update_account",
            ProfileAction::UpdateDriver(_) => "update_driver",
            ProfileAction::ChangePassword(_) => "change_password",
            ProfileAction::UploadAvatar(_) => "upload_avatar",
            ProfileAction::UploadLicense(_) => "upload_license",
        }
    }

    pub fn from_form(mut form: FormData) -> Result<Self> {
        let action = form.trimmed("action").to_string();
        match action.as_str() {
            "update_account" => Ok(ProfileAction::UpdateAccount(account_update(&form)?)),
            "update_driver" => Ok(ProfileAction::UpdateDriver(driver_update(&form)?)),
            "change_password" => Ok(ProfileAction::ChangePassword(PasswordChange {
                current: form.text("currentPassword").unwrap_or("").to_string(),
                new: form.text("newPassword").unwrap_or("").to_string(),
                confirm: form.text("confirmPassword").unwrap_or("").to_string(),
            })),
            "upload_avatar" => form
                .take_file("avatarImage")
                .map(ProfileAction::UploadAvatar)
                .ok_or_else(|| AppError::BadRequest("No image uploaded".to_string())),
            "upload_license" => form
                .take_file("licenseImage")
                .map(ProfileAction::UploadLicense)
                .ok_or_else(|| AppError::BadRequest("No image uploaded".to_string())),
            _ => Err(AppError::BadRequest("Unknown profile action".to_string())),
        }
    }
}

/// Empty means "clear the date"; anything else must parse
fn optional_date(form: &FormData, field: &str, label: &str) -> Result<Option<chrono::NaiveDate>> {
    let raw = form.trimmed(field);
    if raw.is_empty() {
        return Ok(None);
    }
    parse_flexible_date(raw)
        .map(Some)
        .ok_or_else(|| AppError::Validation(format!("Invalid {}", label)))
}

fn account_update(form: &FormData) -> Result<AccountInfoUpdate> {
    Ok(AccountInfoUpdate {
        name: form.trimmed("username").to_string(),
        email: form.trimmed("email").to_string(),
        phone: form.trimmed("phone").to_string(),
        address: form.trimmed("address").to_string(),
        dob: optional_date(form, "dob", "date of birth")?,
    })
}

fn driver_update(form: &FormData) -> Result<DriverInfoUpdate> {
    let years_experience = match form.trimmed("yearsExperience") {
        "" => None,
        raw => Some(
            raw.parse::<u16>()
                .map(i32::from)
                .map_err(|_| {
                    AppError::Validation(
                        "Years of experience must be a non-negative whole number".to_string(),
                    )
                })?,
        ),
    };

    let vehicle_categories = normalize_vehicle_categories(form.all("vehicleCapability"))
        .map_err(|unknown| AppError::Validation(format!("Unknown vehicle category: {}", unknown)))?;

    Ok(DriverInfoUpdate {
        license_number: form.trimmed("licenseNumber").to_string(),
        license_issue_date: optional_date(form, "issueDate", "issue date")?,
        license_expiry_date: optional_date(form, "expiryDate", "expiry date")?,
        years_experience,
        previous_jobs: form.trimmed("previousJobs").to_string(),
        vehicle_categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_unknown_action() {
        let err = ProfileAction::from_form(FormData::default().with_text("action", "drop_tables"))
            .unwrap_err();
        assert_eq!(err.public_message(), "Unknown profile action");

        let err = ProfileAction::from_form(FormData::default()).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_update_account_mapping() {
        let form = FormData::default()
            .with_text("action", "update_account")
            .with_text("username", " Maria Santos ")
            .with_text("email", "maria@example.com")
            .with_text("phone", "09170000000")
            .with_text("address", "Davao")
            .with_text("dob", "");

        let ProfileAction::UpdateAccount(update) = ProfileAction::from_form(form).unwrap() else {
            panic!("expected update_account");
        };
        assert_eq!(update.name, "Maria Santos");
        assert_eq!(update.dob, None);
    }

    #[test]
    fn test_update_driver_mapping() {
        let form = FormData::default()
            .with_text("action", "update_driver")
            .with_text("licenseNumber", "N01-12-345678")
            .with_text("issueDate", "01/05/21")
            .with_text("expiryDate", "2026-01-05")
            .with_text("yearsExperience", "7")
            .with_text("previousJobs", "Delivery rider")
            .with_text("vehicleCapability", "Sedan")
            .with_text("vehicleCapability", "van")
            .with_text("vehicleCapability", "sedan");

        let ProfileAction::UpdateDriver(update) = ProfileAction::from_form(form).unwrap() else {
            panic!("expected update_driver");
        };
        assert_eq!(update.license_issue_date, NaiveDate::from_ymd_opt(2021, 1, 5));
        assert_eq!(update.license_expiry_date, NaiveDate::from_ymd_opt(2026, 1, 5));
        assert_eq!(update.years_experience, Some(7));
        assert_eq!(update.vehicle_categories, vec!["sedan", "van"]);
    }

    #[test]
    fn test_update_driver_rejects_bad_input() {
        let base = || {
            FormData::default()
                .with_text("action", "update_driver")
                .with_text("licenseNumber", "N01")
        };

        let err = ProfileAction::from_form(base().with_text("yearsExperience", "-2")).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        let err = ProfileAction::from_form(base().with_text("issueDate", "yesterday")).unwrap_err();
        assert_eq!(err.public_message(), "Invalid issue date");

        let err =
            ProfileAction::from_form(base().with_text("vehicleCapability", "tank")).unwrap_err();
        assert_eq!(err.public_message(), "Unknown vehicle category: tank");

        // empty optional values clear the field
        let ProfileAction::UpdateDriver(update) =
            ProfileAction::from_form(base().with_text("yearsExperience", "")).unwrap()
        else {
            panic!("expected update_driver");
        };
        assert_eq!(update.years_experience, None);
        assert!(update.vehicle_categories.is_empty());
    }

    #[test]
    fn test_upload_requires_file() {
        let err = ProfileAction::from_form(FormData::default().with_text("action", "upload_avatar"))
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));

        let form = FormData::default()
            .with_text("action", "upload_license")
            .with_file("licenseImage", "lic.png", "image/png", b"png");
        let action = ProfileAction::from_form(form).unwrap();
        assert_eq!(action.name(), "upload_license");
    }
}
