//! Modules layer - Infrastructure components
//!
//! Contains adapters for infrastructure the features share, such as document storage.

pub mod storage;
