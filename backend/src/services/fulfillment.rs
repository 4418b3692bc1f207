//! Fulfillment engine: the only path by which stock leaves inventory
//!
//! Every operation here is one transaction around validate → conditional
//! quantity update → ledger append (→ request status for approvals). A
//! failure at any step rolls the whole unit of work back, so no partially
//! committed state is ever observable to other readers and the stock
//! decrement can never outlive a lost audit entry.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::InventoryService;
use crate::services::ledger::{LedgerService, NewMovement};
use shared::models::{Item, MovementEntry, MovementKind, RequestStatus, StockRequest};
use shared::validation;

/// Fulfillment service coordinating inventory, ledger, and request state
#[derive(Clone)]
pub struct FulfillmentService {
    db: PgPool,
}

/// Input for an outbound movement (distribution or damage write-off)
#[derive(Debug, Deserialize)]
pub struct OutboundInput {
    pub item_name: String,
    pub quantity: i32,
    pub department: Option<String>,
    pub notes: Option<String>,
}

/// Input for a signed manual correction
#[derive(Debug, Deserialize)]
pub struct AdjustmentInput {
    pub item_name: String,
    /// Signed delta; positive credits stock, negative debits it
    pub delta: i32,
    pub notes: Option<String>,
}

/// Input for approving a pending request
#[derive(Debug, Deserialize)]
pub struct ApproveRequestInput {
    pub fulfilled_qty: i32,
    pub notes: Option<String>,
}

/// Result of a fulfillment action: the item snapshot after the mutation and
/// the ledger entry that records it
#[derive(Debug, Serialize)]
pub struct FulfillmentOutcome {
    pub item: Item,
    pub movement: MovementEntry,
}

/// Result of approving a request
#[derive(Debug, Serialize)]
pub struct ApprovalOutcome {
    pub request: StockRequest,
    pub item: Item,
    pub movement: MovementEntry,
}

impl FulfillmentService {
    /// Create a new FulfillmentService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Distribute stock to a department (push-based, admin-initiated)
    pub async fn distribute(&self, actor: &str, input: OutboundInput) -> AppResult<FulfillmentOutcome> {
        self.outbound(actor, MovementKind::Distributed, input).await
    }

    /// Write off damaged stock
    pub async fn record_damage(
        &self,
        actor: &str,
        input: OutboundInput,
    ) -> AppResult<FulfillmentOutcome> {
        self.outbound(actor, MovementKind::Damage, input).await
    }

    /// Apply a signed manual correction
    ///
    /// The same negative-stock guard applies when the delta is negative.
    pub async fn record_adjustment(
        &self,
        actor: &str,
        input: AdjustmentInput,
    ) -> AppResult<FulfillmentOutcome> {
        validation::validate_adjustment_delta(input.delta)
            .map_err(|msg| AppError::InvalidQuantity(msg.to_string()))?;

        let mut tx = self.db.begin().await?;

        let item = InventoryService::find_by_name_on(&mut tx, &input.item_name)
            .await?
            .ok_or_else(|| AppError::ItemNotFound(input.item_name.trim().to_string()))?;

        let item = InventoryService::adjust_quantity_on(&mut tx, item.id, input.delta).await?;

        let movement = LedgerService::append_on(
            &mut tx,
            NewMovement {
                item_id: Some(item.id),
                item_name: item.name.clone(),
                movement_type: MovementKind::Adjustment,
                quantity: input.delta,
                actor: actor.to_string(),
                department: None,
                notes: input.notes,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(FulfillmentOutcome { item, movement })
    }

    /// Approve a pending request and fulfill it in the same unit of work
    ///
    /// The conditional status flip claims the request first, so a racing
    /// second approval observes `AlreadyResolved`. If the item lookup or the
    /// stock decrement then fails, the rollback returns the request to
    /// Pending untouched and the caller is told why.
    pub async fn approve_request(
        &self,
        actor: &str,
        request_id: Uuid,
        input: ApproveRequestInput,
    ) -> AppResult<ApprovalOutcome> {
        validation::validate_quantity(input.fulfilled_qty)
            .map_err(|msg| AppError::InvalidQuantity(msg.to_string()))?;

        let mut tx = self.db.begin().await?;

        let claimed = sqlx::query_as::<_, StockRequest>(
            r#"
            UPDATE stock_requests
            SET status = 'approved', resolution_notes = $2, updated_at = NOW()
            WHERE id = $1 AND status = 'pending'
            RETURNING id, department, requested_by, item_id, item_name, quantity, unit,
                      reason, status, archived, resolution_notes, created_at, updated_at
            "#,
        )
        .bind(request_id)
        .bind(&input.notes)
        .fetch_optional(&mut *tx)
        .await?;

        let request = match claimed {
            Some(request) => request,
            None => {
                let status = sqlx::query_scalar::<_, RequestStatus>(
                    "SELECT status FROM stock_requests WHERE id = $1",
                )
                .bind(request_id)
                .fetch_optional(&mut *tx)
                .await?;

                return Err(match status {
                    Some(_) => AppError::AlreadyResolved(request_id),
                    None => AppError::NotFound("Request".to_string()),
                });
            }
        };

        // Prefer the binding resolved at creation time; fall back to the
        // name match for requests that predate the item.
        let item = match request.item_id {
            Some(item_id) => sqlx::query_as::<_, Item>(
                r#"
                SELECT id, name, category, unit, unit_cost, stock_qty, min_stock,
                       is_active, created_at, updated_at
                FROM items
                WHERE id = $1 AND is_active
                "#,
            )
            .bind(item_id)
            .fetch_optional(&mut *tx)
            .await?,
            None => InventoryService::find_by_name_on(&mut tx, &request.item_name).await?,
        };

        let item = item.ok_or_else(|| AppError::ItemNotFound(request.item_name.clone()))?;

        let item =
            InventoryService::adjust_quantity_on(&mut tx, item.id, -input.fulfilled_qty).await?;

        let movement = LedgerService::append_on(
            &mut tx,
            NewMovement {
                item_id: Some(item.id),
                item_name: item.name.clone(),
                movement_type: MovementKind::Distributed,
                quantity: -input.fulfilled_qty,
                actor: actor.to_string(),
                department: Some(request.department.clone()),
                notes: input.notes,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(ApprovalOutcome {
            request,
            item,
            movement,
        })
    }

    /// Shared outbound path: resolve, decrement, append, commit
    async fn outbound(
        &self,
        actor: &str,
        kind: MovementKind,
        input: OutboundInput,
    ) -> AppResult<FulfillmentOutcome> {
        validation::validate_quantity(input.quantity)
            .map_err(|msg| AppError::InvalidQuantity(msg.to_string()))?;

        let mut tx = self.db.begin().await?;

        let item = InventoryService::find_by_name_on(&mut tx, &input.item_name)
            .await?
            .ok_or_else(|| AppError::ItemNotFound(input.item_name.trim().to_string()))?;

        let item = InventoryService::adjust_quantity_on(&mut tx, item.id, -input.quantity).await?;

        let movement = LedgerService::append_on(
            &mut tx,
            NewMovement {
                item_id: Some(item.id),
                item_name: item.name.clone(),
                movement_type: kind,
                quantity: -input.quantity,
                actor: actor.to_string(),
                department: input.department,
                notes: input.notes,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(FulfillmentOutcome { item, movement })
    }
}
