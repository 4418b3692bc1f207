//! Inventory store service: the single source of truth for quantity-on-hand
//!
//! This service only keeps quantities. It never writes to the movement
//! ledger; pairing a quantity change with its audit entry is the fulfillment
//! engine's job.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Item;
use shared::types::Pagination;
use shared::validation;

/// Inventory service for managing items and their stock levels
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Input for creating an inventory item
#[derive(Debug, Deserialize)]
pub struct CreateItemInput {
    pub name: String,
    pub category: String,
    pub unit: String,
    pub unit_cost: Decimal,
    pub initial_qty: i32,
    pub min_stock: i32,
}

/// Filter for listing items
#[derive(Debug, Default, Deserialize)]
pub struct ItemFilter {
    pub category: Option<String>,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a new item
    ///
    /// Fails with `DuplicateItem` when an active item with the same name
    /// (case-insensitive) already exists; callers holding more of an existing
    /// item should adjust it instead.
    pub async fn create_item(&self, input: CreateItemInput) -> AppResult<Item> {
        let mut conn = self.db.acquire().await?;
        Self::create_item_on(&mut conn, input).await
    }

    /// Create an item on an existing connection or transaction
    pub(crate) async fn create_item_on(
        conn: &mut PgConnection,
        input: CreateItemInput,
    ) -> AppResult<Item> {
        validation::validate_item_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
        })?;
        validation::validate_stock_level(input.initial_qty).map_err(|msg| {
            AppError::Validation {
                field: "initial_qty".to_string(),
                message: msg.to_string(),
            }
        })?;
        validation::validate_stock_level(input.min_stock).map_err(|msg| AppError::Validation {
            field: "min_stock".to_string(),
            message: msg.to_string(),
        })?;
        validation::validate_unit_cost(input.unit_cost).map_err(|msg| AppError::Validation {
            field: "unit_cost".to_string(),
            message: msg.to_string(),
        })?;

        let name = input.name.trim().to_string();

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM items WHERE LOWER(name) = LOWER($1) AND is_active)",
        )
        .bind(&name)
        .fetch_one(&mut *conn)
        .await?;

        if exists {
            return Err(AppError::DuplicateItem(name));
        }

        let item = sqlx::query_as::<_, Item>(
            r#"
            INSERT INTO items (name, category, unit, unit_cost, stock_qty, min_stock)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, category, unit, unit_cost, stock_qty, min_stock,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&input.category)
        .bind(&input.unit)
        .bind(input.unit_cost)
        .bind(input.initial_qty)
        .bind(input.min_stock)
        .fetch_one(&mut *conn)
        .await?;

        Ok(item)
    }

    /// Get an item by id
    pub async fn get_item(&self, item_id: Uuid) -> AppResult<Item> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, category, unit, unit_cost, stock_qty, min_stock,
                   is_active, created_at, updated_at
            FROM items
            WHERE id = $1 AND is_active
            "#,
        )
        .bind(item_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Item".to_string()))?;

        Ok(item)
    }

    /// Find an active item by case-insensitive exact name match
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Item>> {
        let mut conn = self.db.acquire().await?;
        Self::find_by_name_on(&mut conn, name).await
    }

    /// Name lookup on an existing connection or transaction
    pub(crate) async fn find_by_name_on(
        conn: &mut PgConnection,
        name: &str,
    ) -> AppResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, category, unit, unit_cost, stock_qty, min_stock,
                   is_active, created_at, updated_at
            FROM items
            WHERE LOWER(name) = LOWER($1) AND is_active
            "#,
        )
        .bind(name.trim())
        .fetch_optional(&mut *conn)
        .await?;

        Ok(item)
    }

    /// List active items, optionally filtered by category
    pub async fn list_items(
        &self,
        filter: ItemFilter,
        pagination: Pagination,
    ) -> AppResult<Vec<Item>> {
        let page = pagination.clamped();

        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, category, unit, unit_cost, stock_qty, min_stock,
                   is_active, created_at, updated_at
            FROM items
            WHERE is_active AND ($1::varchar IS NULL OR category = $1)
            ORDER BY name ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(&filter.category)
        .bind(page.limit)
        .bind(page.offset)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// List active items at or below their reorder threshold
    pub async fn list_low_stock(&self) -> AppResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            r#"
            SELECT id, name, category, unit, unit_cost, stock_qty, min_stock,
                   is_active, created_at, updated_at
            FROM items
            WHERE is_active AND stock_qty <= min_stock
            ORDER BY stock_qty ASC, name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }

    /// Conditional quantity update on an existing connection or transaction
    ///
    /// The negative-stock check and the write are a single statement, so two
    /// sessions racing on the same item can never both pass validation
    /// against stale stock. A zero-row result means either the item is gone
    /// or the guard failed; a follow-up read distinguishes the two.
    pub(crate) async fn adjust_quantity_on(
        conn: &mut PgConnection,
        item_id: Uuid,
        delta: i32,
    ) -> AppResult<Item> {
        let updated = sqlx::query_as::<_, Item>(
            r#"
            UPDATE items
            SET stock_qty = stock_qty + $2, updated_at = NOW()
            WHERE id = $1 AND is_active AND stock_qty + $2 >= 0
            RETURNING id, name, category, unit, unit_cost, stock_qty, min_stock,
                      is_active, created_at, updated_at
            "#,
        )
        .bind(item_id)
        .bind(delta)
        .fetch_optional(&mut *conn)
        .await?;

        match updated {
            Some(item) => Ok(item),
            None => {
                let current = sqlx::query_as::<_, (String, i32)>(
                    "SELECT name, stock_qty FROM items WHERE id = $1 AND is_active",
                )
                .bind(item_id)
                .fetch_optional(&mut *conn)
                .await?;

                match current {
                    Some((name, available)) => Err(AppError::InsufficientStock {
                        item: name,
                        available,
                        requested: -delta,
                    }),
                    None => Err(AppError::NotFound("Item".to_string())),
                }
            }
        }
    }

    /// Soft-delete an item
    ///
    /// Items referenced by ledger entries are never physically removed.
    pub async fn retire_item(&self, item_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("UPDATE items SET is_active = FALSE, updated_at = NOW() WHERE id = $1 AND is_active")
            .bind(item_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Item".to_string()));
        }

        Ok(())
    }
}
