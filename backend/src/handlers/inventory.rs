//! HTTP handlers for inventory endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::models::Item;
use crate::services::inventory::{CreateItemInput, InventoryService, ItemFilter};
use crate::services::ledger::LedgerService;
use crate::AppState;
use shared::types::Pagination;

/// List active items, optionally filtered by category
pub async fn list_items(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Query(filter): Query<ItemFilter>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<Vec<Item>>> {
    let service = InventoryService::new(state.db);
    let items = service.list_items(filter, pagination).await?;
    Ok(Json(items))
}

/// Create an inventory item (admin)
pub async fn create_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateItemInput>,
) -> AppResult<Json<Item>> {
    current_user.0.require_admin()?;
    let service = InventoryService::new(state.db);
    let item = service.create_item(input).await?;
    Ok(Json(item))
}

/// Get a single item
pub async fn get_item(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<Item>> {
    let service = InventoryService::new(state.db);
    let item = service.get_item(item_id).await?;
    Ok(Json(item))
}

/// Retire (soft-delete) an item (admin)
pub async fn retire_item(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    current_user.0.require_admin()?;
    let service = InventoryService::new(state.db);
    service.retire_item(item_id).await?;
    Ok(Json(()))
}

/// List items at or below their reorder threshold
pub async fn list_low_stock(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<Item>>> {
    let service = InventoryService::new(state.db);
    let items = service.list_low_stock().await?;
    Ok(Json(items))
}

/// Response for a single-item ledger comparison
#[derive(Debug, serde::Serialize)]
pub struct ItemBalanceResponse {
    #[serde(flatten)]
    pub item: Item,
    pub ledger_total: i64,
}

/// Get an item together with the signed sum of its ledger entries
pub async fn get_item_balance(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(item_id): Path<Uuid>,
) -> AppResult<Json<ItemBalanceResponse>> {
    let inventory = InventoryService::new(state.db.clone());
    let ledger = LedgerService::new(state.db);

    let item = inventory.get_item(item_id).await?;
    let ledger_total = ledger.ledger_balance(&item.name).await?;

    Ok(Json(ItemBalanceResponse { item, ledger_total }))
}
