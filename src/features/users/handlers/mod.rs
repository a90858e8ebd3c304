pub mod profile_handler;

pub use profile_handler::{
    __path_apply_profile_action, __path_get_profile, apply_profile_action, get_profile,
};
