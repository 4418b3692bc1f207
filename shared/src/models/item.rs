//! Inventory item models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An item tracked by the storeroom
///
/// `stock_qty` is the live quantity-on-hand and is only ever changed through
/// the fulfillment engine's conditional updates; `min_stock` is the reorder
/// threshold at or below which the item is flagged low.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Item {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub unit: String,
    pub unit_cost: Decimal,
    pub stock_qty: i32,
    pub min_stock: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    pub fn is_low_stock(&self) -> bool {
        self.stock_qty <= self.min_stock
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.stock_qty == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn item(stock_qty: i32, min_stock: i32) -> Item {
        Item {
            id: Uuid::new_v4(),
            name: "Bath Towels".to_string(),
            category: "Housekeeping".to_string(),
            unit: "pcs".to_string(),
            unit_cost: Decimal::new(1250, 2),
            stock_qty,
            min_stock,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn low_stock_at_threshold() {
        assert!(item(10, 10).is_low_stock());
        assert!(item(9, 10).is_low_stock());
        assert!(!item(11, 10).is_low_stock());
    }

    #[test]
    fn out_of_stock_only_at_zero() {
        assert!(item(0, 10).is_out_of_stock());
        assert!(!item(1, 10).is_out_of_stock());
    }
}
