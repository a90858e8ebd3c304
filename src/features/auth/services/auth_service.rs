use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AuthResponseDto, AuthUserDto, LoginRequestDto};
use crate::features::auth::model::SessionUser;
use crate::features::auth::password::verify_password;
use crate::features::auth::session_store::SessionStore;
use crate::features::users::repository::AccountRepository;

pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid email or password";

fn invalid_credentials() -> AppError {
    AppError::Unauthorized(INVALID_CREDENTIALS_MESSAGE.to_string())
}

/// Service for session authentication (login, logout)
pub struct AuthService {
    accounts: Arc<dyn AccountRepository>,
    sessions: Arc<SessionStore>,
}

impl AuthService {
    pub fn new(accounts: Arc<dyn AccountRepository>, sessions: Arc<SessionStore>) -> Self {
        Self { accounts, sessions }
    }

    /// Login with email and password.
    ///
    /// Whatever session the request carried is destroyed before the attempt, so a failed
    /// login always leaves the client signed out. Unknown email and wrong password answer
    /// identically.
    pub async fn login(
        &self,
        prior_session: Option<Uuid>,
        dto: LoginRequestDto,
    ) -> Result<(SessionUser, AuthResponseDto)> {
        if let Some(session_id) = prior_session {
            self.sessions.destroy(session_id).await;
        }

        let email = dto.email.trim();
        if email.is_empty() || dto.password.is_empty() {
            return Err(AppError::Validation(
                "Email and password are required.".to_string(),
            ));
        }

        let Some(account) = self.accounts.find_by_email(email).await? else {
            tracing::info!("Login rejected: unknown email");
            return Err(invalid_credentials());
        };

        if !verify_password(&dto.password, &account.password_hash).await? {
            tracing::info!("Login rejected: wrong password for user_id={}", account.id);
            return Err(invalid_credentials());
        }

        let session = self
            .sessions
            .create(account.id, &account.name, &account.email)
            .await;

        tracing::info!("Login succeeded: user_id={}", account.id);

        Ok((
            session,
            AuthResponseDto {
                user: AuthUserDto::from(&account),
            },
        ))
    }

    pub async fn logout(&self, session_id: Option<Uuid>) -> bool {
        match session_id {
            Some(id) => self.sessions.destroy(id).await,
            None => false,
        }
    }
}
