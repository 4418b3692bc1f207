//! Movement ledger models
//!
//! Every inventory-affecting event is recorded as one append-only
//! `MovementEntry`. Entries are never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of inventory movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "movement_kind", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    StockIn,
    Distributed,
    Adjustment,
    Damage,
}

impl MovementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementKind::StockIn => "stock_in",
            MovementKind::Distributed => "distributed",
            MovementKind::Adjustment => "adjustment",
            MovementKind::Damage => "damage",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "stock_in" => Some(MovementKind::StockIn),
            "distributed" => Some(MovementKind::Distributed),
            "adjustment" => Some(MovementKind::Adjustment),
            "damage" => Some(MovementKind::Damage),
            _ => None,
        }
    }

    /// Whether entries of this kind carry a negative quantity delta
    pub fn is_outbound(&self) -> bool {
        matches!(self, MovementKind::Distributed | MovementKind::Damage)
    }
}

/// One append-only ledger entry
///
/// `quantity` is the signed delta applied to the item: positive for
/// `stock_in`, negative for `distributed`/`damage`, either for `adjustment`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovementEntry {
    pub id: i64,
    pub item_id: Option<Uuid>,
    pub item_name: String,
    pub movement_type: MovementKind,
    pub quantity: i32,
    pub user_name: String,
    pub department: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_string_mapping() {
        for kind in [
            MovementKind::StockIn,
            MovementKind::Distributed,
            MovementKind::Adjustment,
            MovementKind::Damage,
        ] {
            assert_eq!(MovementKind::from_str(kind.as_str()), Some(kind));
        }
        assert_eq!(MovementKind::from_str("transfer"), None);
    }

    #[test]
    fn outbound_kinds() {
        assert!(MovementKind::Distributed.is_outbound());
        assert!(MovementKind::Damage.is_outbound());
        assert!(!MovementKind::StockIn.is_outbound());
        assert!(!MovementKind::Adjustment.is_outbound());
    }
}
