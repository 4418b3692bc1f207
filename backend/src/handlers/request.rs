//! HTTP handlers for stock request lifecycle endpoints
//!
//! Staff are scoped to their own department; storeroom administrators see
//! and resolve everything.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::{AuthUser, CurrentUser};
use crate::models::StockRequest;
use crate::services::fulfillment::{ApprovalOutcome, ApproveRequestInput, FulfillmentService};
use crate::services::request::{CreateRequestInput, RequestFilter, RequestService};
use crate::AppState;
use shared::types::Pagination;

#[derive(Deserialize)]
pub struct RejectRequestBody {
    pub reason: Option<String>,
}

/// List requests, scoped to the caller's department for staff
pub async fn list_requests(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(mut filter): Query<RequestFilter>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Vec<StockRequest>>> {
    if !current_user.0.is_admin() {
        filter.department = current_user.0.department.clone();
    }

    let service = RequestService::new(state.db);
    let requests = service.list(filter, pagination).await?;
    Ok(Json(requests))
}

/// Submit a stock request for the caller's department
pub async fn create_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateRequestInput>,
) -> AppResult<Json<StockRequest>> {
    let department = current_user
        .0
        .department
        .clone()
        .ok_or_else(|| AppError::Validation {
            field: "department".to_string(),
            message: "Account has no department to request for".to_string(),
        })?;

    let service = RequestService::new(state.db);
    let request = service
        .create(&department, &current_user.0.display_name, input)
        .await?;
    Ok(Json(request))
}

/// Get a single request
pub async fn get_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
) -> AppResult<Json<StockRequest>> {
    let service = RequestService::new(state.db);
    let request = service.get(request_id).await?;
    check_department_access(&current_user.0, &request)?;
    Ok(Json(request))
}

/// Approve a pending request and fulfill it (admin)
pub async fn approve_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
    Json(input): Json<ApproveRequestInput>,
) -> AppResult<Json<ApprovalOutcome>> {
    current_user.0.require_admin()?;
    let service = FulfillmentService::new(state.db);
    let outcome = service
        .approve_request(&current_user.0.display_name, request_id, input)
        .await?;
    Ok(Json(outcome))
}

/// Reject a pending request (admin)
pub async fn reject_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
    Json(body): Json<RejectRequestBody>,
) -> AppResult<Json<StockRequest>> {
    current_user.0.require_admin()?;
    let service = RequestService::new(state.db);
    let request = service.reject(request_id, body.reason).await?;
    Ok(Json(request))
}

/// Toggle the archived display flag
pub async fn toggle_archive_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
) -> AppResult<Json<StockRequest>> {
    let service = RequestService::new(state.db.clone());
    let request = service.get(request_id).await?;
    check_department_access(&current_user.0, &request)?;

    let request = service.toggle_archive(request_id).await?;
    Ok(Json(request))
}

/// Hard-delete a request (admin cleanup)
pub async fn delete_request(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(request_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_admin()?;
    let service = RequestService::new(state.db);
    service.delete(request_id).await?;
    Ok(Json(()))
}

/// Staff may only touch requests belonging to their own department
fn check_department_access(user: &AuthUser, request: &StockRequest) -> AppResult<()> {
    if user.is_admin() || user.department.as_deref() == Some(request.department.as_str()) {
        Ok(())
    } else {
        Err(AppError::InsufficientPermissions)
    }
}
