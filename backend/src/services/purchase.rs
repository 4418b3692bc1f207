//! Purchase posting service: converting delivered purchase-order lines into
//! inventory quantity
//!
//! Posting mirrors the fulfillment engine's outbound path: one transaction
//! around the over-posting guard, the item credit, and the `stock_in` ledger
//! entry. `posted_qty` accumulates across postings so the same delivery can
//! never be credited beyond the ordered quantity.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::{CreateItemInput, InventoryService};
use crate::services::ledger::{LedgerService, NewMovement};
use shared::models::{Item, MovementEntry, MovementKind, PurchaseLine};
use shared::types::Pagination;
use shared::validation;

/// Purchase service for delivered-goods lines and stock-in posting
#[derive(Clone)]
pub struct PurchaseService {
    db: PgPool,
}

/// Input for registering a delivered purchase-order line
#[derive(Debug, Deserialize)]
pub struct CreateLineInput {
    pub po_number: String,
    pub supplier: Option<String>,
    pub item_name: String,
    pub category: String,
    pub unit: String,
    pub unit_cost: Decimal,
    pub ordered_qty: i32,
}

/// Input for posting part of a delivered line into inventory
#[derive(Debug, Deserialize)]
pub struct PostDeliveryInput {
    pub quantity: i32,
}

/// Result of posting a delivery
#[derive(Debug, Serialize)]
pub struct PostingOutcome {
    pub line: PurchaseLine,
    pub item: Item,
    pub movement: MovementEntry,
}

impl PurchaseService {
    /// Create a new PurchaseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a delivered purchase-order line
    pub async fn create_line(&self, input: CreateLineInput) -> AppResult<PurchaseLine> {
        validation::validate_item_name(&input.item_name).map_err(|msg| AppError::Validation {
            field: "item_name".to_string(),
            message: msg.to_string(),
        })?;
        validation::validate_quantity(input.ordered_qty)
            .map_err(|msg| AppError::InvalidQuantity(msg.to_string()))?;
        validation::validate_unit_cost(input.unit_cost).map_err(|msg| AppError::Validation {
            field: "unit_cost".to_string(),
            message: msg.to_string(),
        })?;

        if input.po_number.trim().is_empty() {
            return Err(AppError::Validation {
                field: "po_number".to_string(),
                message: "PO number cannot be empty".to_string(),
            });
        }

        let line = sqlx::query_as::<_, PurchaseLine>(
            r#"
            INSERT INTO purchase_lines (po_number, supplier, item_name, category, unit,
                                        unit_cost, ordered_qty)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, po_number, supplier, item_name, category, unit, unit_cost,
                      ordered_qty, posted_qty, created_at, updated_at
            "#,
        )
        .bind(input.po_number.trim())
        .bind(&input.supplier)
        .bind(input.item_name.trim())
        .bind(&input.category)
        .bind(&input.unit)
        .bind(input.unit_cost)
        .bind(input.ordered_qty)
        .fetch_one(&self.db)
        .await?;

        Ok(line)
    }

    /// Get a line by id
    pub async fn get_line(&self, line_id: Uuid) -> AppResult<PurchaseLine> {
        let line = sqlx::query_as::<_, PurchaseLine>(
            r#"
            SELECT id, po_number, supplier, item_name, category, unit, unit_cost,
                   ordered_qty, posted_qty, created_at, updated_at
            FROM purchase_lines
            WHERE id = $1
            "#,
        )
        .bind(line_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Purchase line".to_string()))?;

        Ok(line)
    }

    /// List lines, newest first
    pub async fn list_lines(&self, pagination: Pagination) -> AppResult<Vec<PurchaseLine>> {
        let page = pagination.clamped();

        let lines = sqlx::query_as::<_, PurchaseLine>(
            r#"
            SELECT id, po_number, supplier, item_name, category, unit, unit_cost,
                   ordered_qty, posted_qty, created_at, updated_at
            FROM purchase_lines
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await?;

        Ok(lines)
    }

    /// Post a delivered quantity into inventory
    ///
    /// First posting of a new item creates it with the line's catalog data;
    /// subsequent postings credit the existing item. The `posted_qty` bump is
    /// conditional on staying within `ordered_qty`, so concurrent postings of
    /// the same line cannot double-credit.
    pub async fn post_delivery(
        &self,
        actor: &str,
        line_id: Uuid,
        input: PostDeliveryInput,
    ) -> AppResult<PostingOutcome> {
        validation::validate_quantity(input.quantity)
            .map_err(|msg| AppError::InvalidQuantity(msg.to_string()))?;

        let mut tx = self.db.begin().await?;

        let claimed = sqlx::query_as::<_, PurchaseLine>(
            r#"
            UPDATE purchase_lines
            SET posted_qty = posted_qty + $2, updated_at = NOW()
            WHERE id = $1 AND posted_qty + $2 <= ordered_qty
            RETURNING id, po_number, supplier, item_name, category, unit, unit_cost,
                      ordered_qty, posted_qty, created_at, updated_at
            "#,
        )
        .bind(line_id)
        .bind(input.quantity)
        .fetch_optional(&mut *tx)
        .await?;

        let line = match claimed {
            Some(line) => line,
            None => {
                let current = sqlx::query_as::<_, (i32, i32)>(
                    "SELECT ordered_qty, posted_qty FROM purchase_lines WHERE id = $1",
                )
                .bind(line_id)
                .fetch_optional(&mut *tx)
                .await?;

                return Err(match current {
                    Some((ordered, posted)) => AppError::OverPosting {
                        ordered,
                        posted,
                        requested: input.quantity,
                    },
                    None => AppError::NotFound("Purchase line".to_string()),
                });
            }
        };

        let item = match InventoryService::find_by_name_on(&mut tx, &line.item_name).await? {
            Some(existing) => {
                InventoryService::adjust_quantity_on(&mut tx, existing.id, input.quantity).await?
            }
            None => {
                InventoryService::create_item_on(
                    &mut tx,
                    CreateItemInput {
                        name: line.item_name.clone(),
                        category: line.category.clone(),
                        unit: line.unit.clone(),
                        unit_cost: line.unit_cost,
                        initial_qty: input.quantity,
                        min_stock: 0,
                    },
                )
                .await?
            }
        };

        let movement = LedgerService::append_on(
            &mut tx,
            NewMovement {
                item_id: Some(item.id),
                item_name: item.name.clone(),
                movement_type: MovementKind::StockIn,
                quantity: input.quantity,
                actor: actor.to_string(),
                department: None,
                notes: Some(format!("PO {}", line.po_number)),
            },
        )
        .await?;

        tx.commit().await?;

        Ok(PostingOutcome {
            line,
            item,
            movement,
        })
    }
}
