pub mod auth_service;
pub mod registration_service;

pub use auth_service::AuthService;
pub use registration_service::{RegistrationOutcome, RegistrationService};
