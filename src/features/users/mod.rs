//! Driver account and profile feature.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/profile` | Profile with display formatting |
//! | POST | `/api/profile` | Apply one profile action (multipart, `action` field) |

pub mod dtos;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

pub use repository::{AccountRepository, PgAccountRepository};
pub use routes::routes;
pub use services::ProfileService;
