//! Shared types and models for the Hotel Stock Management Platform
//!
//! This crate contains the domain models, common types, and validation rules
//! shared between the backend and other components of the system.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
