pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod history;
pub mod messages;
pub mod schedule;
pub mod users;
pub mod wallet;
