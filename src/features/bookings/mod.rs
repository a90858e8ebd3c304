//! Bookings assigned to drivers.
//!
//! Rows are written by the dispatch back end; this crate only reads them.

pub mod models;
pub mod repository;

pub use repository::{BookingRepository, PgBookingRepository};
