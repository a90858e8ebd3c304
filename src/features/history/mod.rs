//! Compliance history: complaints filed against the driver and finished bookings.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;

pub use repository::{ComplaintRepository, PgComplaintRepository};
pub use routes::routes;
pub use services::HistoryService;
