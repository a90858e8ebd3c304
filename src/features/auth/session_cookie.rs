use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::config::SessionConfig;
use crate::features::auth::session_store::SessionStore;

/// Builds and reads the session cookie
#[derive(Debug, Clone)]
pub struct SessionCookies {
    name: String,
    secure: bool,
}

impl SessionCookies {
    pub fn new(name: impl Into<String>, secure: bool) -> Self {
        Self {
            name: name.into(),
            secure,
        }
    }

    pub fn from_config(config: &SessionConfig) -> Self {
        Self::new(config.cookie_name.clone(), config.cookie_secure)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn issue(&self, session_id: Uuid) -> Cookie<'static> {
        Cookie::build((self.name.clone(), session_id.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }

    /// Removal cookie matching the issued cookie's path
    pub fn clear(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), "")).path("/").build()
    }

    /// Session id carried by the request, if it is a well-formed id
    pub fn read(&self, jar: &CookieJar) -> Option<Uuid> {
        jar.get(&self.name)
            .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
    }
}

/// State of the `require_session` middleware
#[derive(Clone)]
pub struct SessionGate {
    pub store: Arc<SessionStore>,
    pub cookies: SessionCookies,
    pub login_path: String,
}

impl SessionGate {
    pub fn new(store: Arc<SessionStore>, cookies: SessionCookies, login_path: &str) -> Self {
        Self {
            store,
            cookies,
            login_path: login_path.to_string(),
        }
    }
}
