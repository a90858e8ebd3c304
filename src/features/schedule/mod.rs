//! Booking lifecycle board and route overlays of the schedule page.

pub mod board;
pub mod dtos;
pub mod handlers;
pub mod overlay;
pub mod routes;
pub mod services;

pub use routes::routes;
pub use services::ScheduleService;
