//! Driver to passenger messaging, kept in memory per driver.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use models::PassengerContact;
pub use routes::routes;
pub use services::MessageService;
