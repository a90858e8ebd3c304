pub mod dashboard_handler;

pub use dashboard_handler::{__path_get_overview, get_overview};
