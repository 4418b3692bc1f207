//! HTTP handlers for movement ledger queries

use axum::{
    extract::{Query, State},
    Json,
};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::MovementEntry;
use crate::services::ledger::{LedgerService, MovementFilter};
use crate::AppState;

/// List ledger entries, newest first
pub async fn list_movements(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<MovementFilter>,
) -> AppResult<Json<Vec<MovementEntry>>> {
    let service = LedgerService::new(state.db);
    let entries = service.list(filter).await?;
    Ok(Json(entries))
}
