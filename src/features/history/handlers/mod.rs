pub mod history_handler;

pub use history_handler::{__path_get_history, __path_get_report, get_history, get_report};
