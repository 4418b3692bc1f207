//! Purchase order line models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A delivered purchase-order line awaiting posting into inventory
///
/// `posted_qty` tracks how much of the line has already been credited to
/// stock, so repeated postings can never exceed `ordered_qty`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct PurchaseLine {
    pub id: Uuid,
    pub po_number: String,
    pub supplier: Option<String>,
    pub item_name: String,
    pub category: String,
    pub unit: String,
    pub unit_cost: Decimal,
    pub ordered_qty: i32,
    pub posted_qty: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PurchaseLine {
    /// Quantity still available to post against this line
    pub fn remaining_qty(&self) -> i32 {
        self.ordered_qty - self.posted_qty
    }

    pub fn is_fully_posted(&self) -> bool {
        self.posted_qty >= self.ordered_qty
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn line(ordered: i32, posted: i32) -> PurchaseLine {
        PurchaseLine {
            id: Uuid::new_v4(),
            po_number: "PO-2024-0041".to_string(),
            supplier: Some("Linens Direct".to_string()),
            item_name: "Bath Towels".to_string(),
            category: "Housekeeping".to_string(),
            unit: "pcs".to_string(),
            unit_cost: Decimal::new(1250, 2),
            ordered_qty: ordered,
            posted_qty: posted,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn remaining_quantity() {
        assert_eq!(line(50, 0).remaining_qty(), 50);
        assert_eq!(line(50, 30).remaining_qty(), 20);
        assert_eq!(line(50, 50).remaining_qty(), 0);
    }

    #[test]
    fn fully_posted() {
        assert!(!line(50, 49).is_fully_posted());
        assert!(line(50, 50).is_fully_posted());
    }
}
