//! Database models for the Hotel Stock Management Platform
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
