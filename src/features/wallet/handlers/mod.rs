pub mod wallet_handler;

pub use wallet_handler::{__path_get_wallet, get_wallet};
