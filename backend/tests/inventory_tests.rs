//! Inventory store tests
//!
//! Tests for quantity keeping and thresholds:
//! - the conditional adjust guard and its error data
//! - reorder threshold (low/out-of-stock) flagging
//! - duplicate item name detection, case-insensitive

use proptest::prelude::*;
use shared::validation;

/// Mirrors the conditional update guard on items: the delta applies only if
/// the resulting quantity stays non-negative
fn conditional_adjust(stock: i32, delta: i32) -> Result<i32, (i32, i32)> {
    let next = stock + delta;
    if next >= 0 {
        Ok(next)
    } else {
        Err((stock, -delta))
    }
}

/// Case-insensitive duplicate check over existing active item names
fn is_duplicate(existing: &[&str], candidate: &str) -> bool {
    existing
        .iter()
        .any(|name| validation::item_names_match(name, candidate))
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_adjust_applies_signed_delta() {
        assert_eq!(conditional_adjust(50, -20), Ok(30));
        assert_eq!(conditional_adjust(50, 20), Ok(70));
        assert_eq!(conditional_adjust(50, -50), Ok(0));
    }

    #[test]
    fn test_adjust_rejects_negative_result() {
        // The error carries what was available and what was asked for
        assert_eq!(conditional_adjust(30, -40), Err((30, 40)));
        assert_eq!(conditional_adjust(0, -1), Err((0, 1)));
    }

    #[test]
    fn test_low_stock_flag_at_threshold() {
        // An item is low at or below its reorder threshold
        let is_low = |qty: i32, min: i32| qty <= min;
        assert!(is_low(10, 10));
        assert!(is_low(3, 10));
        assert!(!is_low(11, 10));
    }

    #[test]
    fn test_duplicate_names_case_insensitive() {
        let existing = ["Bath Towels", "Hand Soap"];
        assert!(is_duplicate(&existing, "bath towels"));
        assert!(is_duplicate(&existing, "BATH TOWELS"));
        assert!(is_duplicate(&existing, " Hand Soap "));
        assert!(!is_duplicate(&existing, "Pool Towels"));
    }

    #[test]
    fn test_item_name_rules() {
        assert!(validation::validate_item_name("Bath Towels").is_ok());
        assert!(validation::validate_item_name("").is_err());
        assert!(validation::validate_item_name("   ").is_err());
    }

    #[test]
    fn test_stock_level_rules() {
        assert!(validation::validate_stock_level(0).is_ok());
        assert!(validation::validate_stock_level(500).is_ok());
        assert!(validation::validate_stock_level(-1).is_err());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Applying any sequence of signed deltas through the guard never
        /// produces a negative quantity
        #[test]
        fn prop_guarded_adjustments_never_go_negative(
            initial in 0i32..=1000,
            deltas in prop::collection::vec(-300i32..=300, 1..50)
        ) {
            let mut stock = initial;
            for delta in deltas {
                if let Ok(next) = conditional_adjust(stock, delta) {
                    stock = next;
                }
                prop_assert!(stock >= 0);
            }
        }

        /// A rejected adjustment reports the stock that was actually available
        #[test]
        fn prop_insufficient_error_reports_available(
            stock in 0i32..=100,
            over in 1i32..=100
        ) {
            let requested = stock + over;
            let err = conditional_adjust(stock, -requested).unwrap_err();
            prop_assert_eq!(err, (stock, requested));
        }

        /// Successful adjustments are exact: no rounding, no clamping
        #[test]
        fn prop_adjustment_is_exact(
            initial in 0i32..=1000,
            delta in -1000i32..=1000
        ) {
            if let Ok(next) = conditional_adjust(initial, delta) {
                prop_assert_eq!(next, initial + delta);
            }
        }
    }
}
