//! HTTP middleware for the Hotel Stock Management Platform

mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
