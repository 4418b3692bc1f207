//! Ledger/store reconciliation
//!
//! Item creation posts the opening `stock_in` entry and every later mutation
//! runs in the same transaction as its ledger append, so each active item's
//! quantity-on-hand should equal the signed sum of its movements. A nonzero
//! difference means a write was lost outside the application's control and
//! needs operator attention.

use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;

/// Reconciliation service comparing the inventory store against the ledger
#[derive(Clone)]
pub struct ReconciliationService {
    db: PgPool,
}

/// One item whose quantity-on-hand disagrees with its ledger total
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct LedgerDiscrepancy {
    pub item_id: Uuid,
    pub item_name: String,
    pub stock_qty: i32,
    pub ledger_total: i64,
    /// `stock_qty - ledger_total`
    pub difference: i64,
}

/// Result of a reconciliation pass
#[derive(Debug, Serialize)]
pub struct ReconciliationReport {
    pub items_checked: i64,
    pub discrepancies: Vec<LedgerDiscrepancy>,
}

impl ReconciliationReport {
    pub fn is_consistent(&self) -> bool {
        self.discrepancies.is_empty()
    }
}

impl ReconciliationService {
    /// Create a new ReconciliationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Compare every active item against the signed sum of its movements
    pub async fn audit(&self) -> AppResult<ReconciliationReport> {
        let items_checked =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM items WHERE is_active")
                .fetch_one(&self.db)
                .await?;

        let discrepancies = sqlx::query_as::<_, LedgerDiscrepancy>(
            r#"
            SELECT i.id AS item_id,
                   i.name AS item_name,
                   i.stock_qty,
                   COALESCE(m.total, 0)::BIGINT AS ledger_total,
                   (i.stock_qty - COALESCE(m.total, 0))::BIGINT AS difference
            FROM items i
            LEFT JOIN (
                SELECT LOWER(item_name) AS item_key, SUM(quantity) AS total
                FROM stock_movements
                GROUP BY LOWER(item_name)
            ) m ON LOWER(i.name) = m.item_key
            WHERE i.is_active AND i.stock_qty <> COALESCE(m.total, 0)
            ORDER BY i.name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(ReconciliationReport {
            items_checked,
            discrepancies,
        })
    }
}
