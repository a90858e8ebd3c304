use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::SessionUser;
use crate::features::auth::{hash_password, verify_password, SessionStore};
use crate::features::users::dtos::{ProfileActionResponseDto, ProfileResponseDto};
use crate::features::users::forms::{PasswordChange, ProfileAction};
use crate::features::users::models::{
    Account, AccountInfoUpdate, DocumentSlot, DriverInfoUpdate,
};
use crate::features::users::repository::AccountRepository;
use crate::modules::storage::upload_policy::{
    is_image_type_allowed, stored_extension, INVALID_IMAGE_TYPE_MESSAGE,
};
use crate::modules::storage::{DocumentFolder, LocalStorage};
use crate::shared::constants::MIN_PASSWORD_LENGTH;
use crate::shared::multipart::UploadedFile;

/// Outcome of a profile action: user-facing message plus response body
#[derive(Debug)]
pub struct ProfileActionOutcome {
    pub message: String,
    pub body: ProfileActionResponseDto,
}

struct UploadTarget {
    slot: DocumentSlot,
    folder: DocumentFolder,
    field: &'static str,
    failure_message: &'static str,
    success_message: &'static str,
}

const AVATAR_UPLOAD: UploadTarget = UploadTarget {
    slot: DocumentSlot::Avatar,
    folder: DocumentFolder::Avatars,
    field: "avatar",
    failure_message: "Failed to upload image",
    success_message: "Profile picture updated successfully",
};

const LICENSE_UPLOAD: UploadTarget = UploadTarget {
    slot: DocumentSlot::LicenseImage,
    folder: DocumentFolder::Licenses,
    field: "license",
    failure_message: "Failed to upload license image",
    success_message: "License image updated successfully",
};

pub struct ProfileService {
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<SessionStore>,
    storage: Arc<LocalStorage>,
}

impl ProfileService {
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

    async fn load_account(&self, user: &SessionUser) -> Result<Account> {
        self.accounts
            .find_by_id(user.user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Account not found".to_string()))
    }

    pub async fn get_profile(&self, user: &SessionUser) -> Result<ProfileResponseDto> {
        let account = self.load_account(user).await?;
        Ok(ProfileResponseDto::from(&account))
    }

    pub async fn apply(
        &self,
        user: &SessionUser,
        action: ProfileAction,
    ) -> Result<ProfileActionOutcome> {
        let name = action.name();
        let (message, path) = match action {
            ProfileAction::UpdateAccount(update) => (self.update_account(user, update).await?, None),
            ProfileAction::UpdateDriver(update) => (self.update_driver(user, update).await?, None),
            ProfileAction::ChangePassword(change) => {
                (self.change_password(user, change).await?, None)
            }
            ProfileAction::UploadAvatar(file) => {
                let path = self.upload_document(user, file, &AVATAR_UPLOAD).await?;
                (AVATAR_UPLOAD.success_message.to_string(), Some(path))
            }
            ProfileAction::UploadLicense(file) => {
                let path = self.upload_document(user, file, &LICENSE_UPLOAD).await?;
                (LICENSE_UPLOAD.success_message.to_string(), Some(path))
            }
        };

        Ok(ProfileActionOutcome {
            message,
            body: ProfileActionResponseDto {
                action: name.to_string(),
                path,
            },
        })
    }

    async fn update_account(&self, user: &SessionUser, update: AccountInfoUpdate) -> Result<String> {
        if update.email != user.email && self.accounts.email_exists(&update.email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        self.accounts
            .update_account_info(user.user_id, &update)
            .await?;
        self.sessions
            .update_identity(user.session_id, &update.name, &update.email)
            .await;

        tracing::info!("Account info updated: user_id={}", user.user_id);
        Ok("Account information updated successfully".to_string())
    }

    async fn update_driver(&self, user: &SessionUser, update: DriverInfoUpdate) -> Result<String> {
        self.accounts
            .update_driver_info(user.user_id, &update)
            .await?;

        tracing::info!(
            "Driver info updated: user_id={}, vehicle_categories={}",
            user.user_id,
            update.vehicle_categories.len()
        );
        Ok("Driver information updated successfully".to_string())
    }

    /// Checks run in a fixed order and only the first failure is reported
    async fn change_password(&self, user: &SessionUser, change: PasswordChange) -> Result<String> {
        let account = self.load_account(user).await?;

        if !verify_password(&change.current, &account.password_hash).await? {
            return Err(AppError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }
        if change.new != change.confirm {
            return Err(AppError::Validation("New passwords do not match".to_string()));
        }
        if change.new.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AppError::Validation(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        let password_hash = hash_password(&change.new).await?;
        self.accounts
            .update_password(user.user_id, &password_hash)
            .await?;

        tracing::info!("Password changed: user_id={}", user.user_id);
        Ok("Password changed successfully".to_string())
    }

    async fn upload_document(
        &self,
        user: &SessionUser,
        file: UploadedFile,
        target: &UploadTarget,
    ) -> Result<String> {
        if !is_image_type_allowed(&file.content_type) {
            return Err(AppError::Validation(INVALID_IMAGE_TYPE_MESSAGE.to_string()));
        }

        let account = self.load_account(user).await?;
        let previous = target.slot.current(&account).map(str::to_string);

        let extension = stored_extension(&file.file_name, &file.content_type);
        let stored = self
            .storage
            .store(
                target.folder,
                target.field,
                &user.user_id.to_string(),
                &extension,
                &file.data,
            )
            .await
            .map_err(|e| {
                tracing::error!("Failed to write {} upload: {}", target.field, e);
                AppError::OperationFailed(target.failure_message.to_string())
            })?;

        if let Err(e) = self
            .accounts
            .update_document(user.user_id, target.slot, &stored.public_path)
            .await
        {
            tracing::error!("Failed to record {} upload: {}", target.field, e);
            self.storage.discard(&stored).await;
            return Err(AppError::OperationFailed(target.failure_message.to_string()));
        }

        if let Some(previous) = previous.filter(|p| *p != stored.public_path) {
            self.storage.remove_replaced(&previous).await;
        }

        tracing::info!(
            "{} replaced: user_id={}, path={}",
            target.slot.column(),
            user.user_id,
            stored.public_path
        );
        Ok(stored.public_path)
    }
}
