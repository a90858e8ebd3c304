pub mod wallet_dto;

pub use wallet_dto::*;
