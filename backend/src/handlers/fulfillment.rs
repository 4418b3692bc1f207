//! HTTP handlers for fulfillment actions (distribution, damage, adjustment)

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::fulfillment::{
    AdjustmentInput, FulfillmentOutcome, FulfillmentService, OutboundInput,
};
use crate::AppState;

/// Distribute stock to a department (admin)
pub async fn record_distribution(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<OutboundInput>,
) -> AppResult<Json<FulfillmentOutcome>> {
    current_user.0.require_admin()?;
    let service = FulfillmentService::new(state.db);
    let outcome = service
        .distribute(&current_user.0.display_name, input)
        .await?;
    Ok(Json(outcome))
}

/// Write off damaged stock (admin)
pub async fn record_damage(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<OutboundInput>,
) -> AppResult<Json<FulfillmentOutcome>> {
    current_user.0.require_admin()?;
    let service = FulfillmentService::new(state.db);
    let outcome = service
        .record_damage(&current_user.0.display_name, input)
        .await?;
    Ok(Json(outcome))
}

/// Apply a signed manual correction (admin)
pub async fn record_adjustment(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<AdjustmentInput>,
) -> AppResult<Json<FulfillmentOutcome>> {
    current_user.0.require_admin()?;
    let service = FulfillmentService::new(state.db);
    let outcome = service
        .record_adjustment(&current_user.0.display_name, input)
        .await?;
    Ok(Json(outcome))
}
