//! Stock request models
//!
//! A department submits a request for stock; an approver resolves it exactly
//! once. The `archived` flag is a display-only dimension and never feeds back
//! into the status machine.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status of a stock request
///
/// Transitions are one-directional: `Pending` resolves to `Approved` or
/// `Rejected` and both are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "request_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(RequestStatus::Pending),
            "approved" => Some(RequestStatus::Approved),
            "rejected" => Some(RequestStatus::Rejected),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, RequestStatus::Pending)
    }
}

/// A department-submitted stock request
///
/// `item_id` is resolved from `item_name` at creation time when the named
/// item already exists in inventory; requests naming items not yet stocked
/// keep the name-only binding.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StockRequest {
    pub id: Uuid,
    pub department: String,
    pub requested_by: String,
    pub item_id: Option<Uuid>,
    pub item_name: String,
    pub quantity: i32,
    pub unit: String,
    pub reason: Option<String>,
    pub status: RequestStatus,
    pub archived: bool,
    pub resolution_notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
