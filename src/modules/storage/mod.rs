//! Storage module for uploaded documents
//!
//! Provides local-disk storage for driver documents and avatars, plus the
//! upload policy (accepted image types, stored extension).

mod local_storage;
pub mod upload_policy;

pub use local_storage::{DocumentFolder, LocalStorage, StoredFile};
