//! Movement ledger service: durable, append-only inventory history
//!
//! The only write is `append`. Nothing in this module (or anywhere else in
//! the backend) updates or deletes a ledger row.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use shared::models::{MovementEntry, MovementKind};

/// Ledger service for recording and querying stock movements
#[derive(Clone)]
pub struct LedgerService {
    db: PgPool,
}

/// A movement about to be appended
#[derive(Debug)]
pub struct NewMovement {
    pub item_id: Option<Uuid>,
    pub item_name: String,
    pub movement_type: MovementKind,
    /// Signed delta: positive for stock_in, negative for distributed/damage
    pub quantity: i32,
    pub actor: String,
    pub department: Option<String>,
    pub notes: Option<String>,
}

/// Filter for listing movements
#[derive(Debug, Default, Deserialize)]
pub struct MovementFilter {
    pub kind: Option<MovementKind>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}

impl LedgerService {
    const DEFAULT_LIMIT: i64 = 100;
    const MAX_LIMIT: i64 = 500;

    /// Create a new LedgerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Append on an existing connection or transaction
    ///
    /// Errors surface to the caller: a lost ledger write breaks the audit
    /// trail, so the caller must know whether it succeeded.
    pub(crate) async fn append_on(
        conn: &mut PgConnection,
        movement: NewMovement,
    ) -> AppResult<MovementEntry> {
        let entry = sqlx::query_as::<_, MovementEntry>(
            r#"
            INSERT INTO stock_movements (item_id, item_name, movement_type, quantity,
                                         user_name, department, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, item_id, item_name, movement_type, quantity, user_name,
                      department, notes, created_at
            "#,
        )
        .bind(movement.item_id)
        .bind(&movement.item_name)
        .bind(movement.movement_type)
        .bind(movement.quantity)
        .bind(&movement.actor)
        .bind(&movement.department)
        .bind(&movement.notes)
        .fetch_one(&mut *conn)
        .await?;

        Ok(entry)
    }

    /// List movements, newest first
    pub async fn list(&self, filter: MovementFilter) -> AppResult<Vec<MovementEntry>> {
        let limit = filter
            .limit
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT);

        let entries = sqlx::query_as::<_, MovementEntry>(
            r#"
            SELECT id, item_id, item_name, movement_type, quantity, user_name,
                   department, notes, created_at
            FROM stock_movements
            WHERE ($1::movement_kind IS NULL OR movement_type = $1)
              AND ($2::timestamptz IS NULL OR created_at >= $2)
              AND ($3::timestamptz IS NULL OR created_at <= $3)
            ORDER BY created_at DESC, id DESC
            LIMIT $4
            "#,
        )
        .bind(filter.kind)
        .bind(filter.from)
        .bind(filter.to)
        .bind(limit)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    /// Signed sum of all deltas recorded for an item
    ///
    /// Because item creation itself posts the opening `stock_in` entry, this
    /// equals the item's quantity-on-hand whenever no write has been lost.
    pub async fn ledger_balance(&self, item_name: &str) -> AppResult<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COALESCE(SUM(quantity), 0)::BIGINT
            FROM stock_movements
            WHERE LOWER(item_name) = LOWER($1)
            "#,
        )
        .bind(item_name.trim())
        .fetch_one(&self.db)
        .await?;

        Ok(total)
    }
}
