//! Error handling for the Hotel Stock Management Platform
//!
//! Every error maps to an HTTP status and a stable machine-readable code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),

    #[error("Duplicate item: {0}")]
    DuplicateItem(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("No inventory item named '{0}'")]
    ItemNotFound(String),

    // Business rule errors
    #[error("Insufficient stock of '{item}': {available} available, {requested} requested")]
    InsufficientStock {
        item: String,
        available: i32,
        requested: i32,
    },

    #[error("Posting {requested} would exceed ordered quantity ({posted} of {ordered} already posted)")]
    OverPosting {
        ordered: i32,
        posted: i32,
        requested: i32,
    },

    #[error("Request {0} has already been resolved")]
    AlreadyResolved(Uuid),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ErrorDetail {
    fn new(code: &str, message: String) -> Self {
        Self {
            code: code.to_string(),
            message,
            field: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("INVALID_CREDENTIALS", "Invalid username or password".to_string()),
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("TOKEN_EXPIRED", "Token has expired".to_string()),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("INVALID_TOKEN", "Invalid token".to_string()),
            ),
            AppError::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                ErrorDetail::new(
                    "INSUFFICIENT_PERMISSIONS",
                    "You do not have permission to perform this action".to_string(),
                ),
            ),
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message: message.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::InvalidQuantity(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("INVALID_QUANTITY", msg.clone()),
            ),
            AppError::DuplicateItem(name) => (
                StatusCode::CONFLICT,
                ErrorDetail::new(
                    "DUPLICATE_ITEM",
                    format!("An item named '{}' already exists", name),
                ),
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource)),
            ),
            AppError::ItemNotFound(name) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new(
                    "ITEM_NOT_FOUND",
                    format!("No inventory item named '{}'", name),
                ),
            ),
            AppError::InsufficientStock {
                item,
                available,
                requested,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new(
                    "INSUFFICIENT_STOCK",
                    format!(
                        "Insufficient stock of '{}': {} available, {} requested",
                        item, available, requested
                    ),
                ),
            ),
            AppError::OverPosting {
                ordered,
                posted,
                requested,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail::new(
                    "OVER_POSTING",
                    format!(
                        "Posting {} would exceed the ordered quantity ({} of {} already posted)",
                        requested, posted, ordered
                    ),
                ),
            ),
            AppError::AlreadyResolved(id) => (
                StatusCode::CONFLICT,
                ErrorDetail::new(
                    "ALREADY_RESOLVED",
                    format!("Request {} has already been resolved", id),
                ),
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("DATABASE_ERROR", "A database error occurred".to_string()),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", msg.clone()),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new(
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                ),
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
