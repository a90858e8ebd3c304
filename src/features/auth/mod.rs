mod password;
mod session_cookie;
mod session_store;

pub mod dtos;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use handlers::AuthState;
pub use password::{hash_password, verify_password};
pub use session_cookie::{SessionCookies, SessionGate};
pub use session_store::SessionStore;
