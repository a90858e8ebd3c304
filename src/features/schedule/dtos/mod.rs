pub mod schedule_dto;

pub use schedule_dto::*;
