//! HTTP handler for the ledger/store reconciliation pass

use axum::{extract::State, Json};

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::reconciliation::{ReconciliationReport, ReconciliationService};
use crate::AppState;

/// Run a reconciliation pass over all active items (admin)
pub async fn run_reconciliation(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<ReconciliationReport>> {
    current_user.0.require_admin()?;
    let service = ReconciliationService::new(state.db);
    let report = service.audit().await?;
    Ok(Json(report))
}
