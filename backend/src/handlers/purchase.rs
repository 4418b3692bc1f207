//! HTTP handlers for purchase line and stock-in posting endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::PurchaseLine;
use crate::services::purchase::{
    CreateLineInput, PostDeliveryInput, PostingOutcome, PurchaseService,
};
use crate::AppState;
use shared::types::Pagination;

/// Register a delivered purchase-order line (admin)
pub async fn create_purchase_line(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateLineInput>,
) -> AppResult<Json<PurchaseLine>> {
    current_user.0.require_admin()?;
    let service = PurchaseService::new(state.db);
    let line = service.create_line(input).await?;
    Ok(Json(line))
}

/// List purchase lines
pub async fn list_purchase_lines(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Vec<PurchaseLine>>> {
    current_user.0.require_admin()?;
    let service = PurchaseService::new(state.db);
    let lines = service.list_lines(pagination).await?;
    Ok(Json(lines))
}

/// Get a single purchase line
pub async fn get_purchase_line(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(line_id): Path<Uuid>,
) -> AppResult<Json<PurchaseLine>> {
    current_user.0.require_admin()?;
    let service = PurchaseService::new(state.db);
    let line = service.get_line(line_id).await?;
    Ok(Json(line))
}

/// Post a delivered quantity into inventory (admin)
pub async fn post_delivery(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(line_id): Path<Uuid>,
    Json(input): Json<PostDeliveryInput>,
) -> AppResult<Json<PostingOutcome>> {
    current_user.0.require_admin()?;
    let service = PurchaseService::new(state.db);
    let outcome = service
        .post_delivery(&current_user.0.display_name, line_id, input)
        .await?;
    Ok(Json(outcome))
}
