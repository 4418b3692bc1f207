//! Purchase posting tests
//!
//! Tests for the stock-in path:
//! - posted totals can never exceed the ordered quantity
//! - repeated postings accumulate and then stop at the ordered quantity
//! - a successful posting credits stock and appends one stock_in entry

use proptest::prelude::*;
use shared::models::MovementKind;

// ============================================================================
// Simulation of the posting guard
//
// Mirrors `UPDATE purchase_lines SET posted_qty = posted_qty + $q
//          WHERE posted_qty + $q <= ordered_qty` with an affected-row check.
// ============================================================================

struct SimLine {
    ordered_qty: i32,
    posted_qty: i32,
    stock: i32,
    ledger: Vec<(MovementKind, i32)>,
}

impl SimLine {
    fn new(ordered_qty: i32) -> Self {
        Self {
            ordered_qty,
            posted_qty: 0,
            stock: 0,
            ledger: Vec::new(),
        }
    }

    fn post(&mut self, qty: i32) -> Result<(), PostError> {
        if qty <= 0 {
            return Err(PostError::InvalidQuantity);
        }
        if self.posted_qty + qty > self.ordered_qty {
            return Err(PostError::OverPosting {
                ordered: self.ordered_qty,
                posted: self.posted_qty,
                requested: qty,
            });
        }
        self.posted_qty += qty;
        self.stock += qty;
        self.ledger.push((MovementKind::StockIn, qty));
        Ok(())
    }
}

#[derive(Debug, PartialEq)]
enum PostError {
    InvalidQuantity,
    OverPosting {
        ordered: i32,
        posted: i32,
        requested: i32,
    },
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_single_posting_credits_stock() {
        let mut line = SimLine::new(50);
        line.post(50).unwrap();

        assert_eq!(line.posted_qty, 50);
        assert_eq!(line.stock, 50);
        assert_eq!(line.ledger, vec![(MovementKind::StockIn, 50)]);
    }

    #[test]
    fn test_partial_postings_accumulate() {
        let mut line = SimLine::new(100);
        line.post(40).unwrap();
        line.post(60).unwrap();

        assert_eq!(line.posted_qty, 100);
        assert_eq!(line.stock, 100);
        assert_eq!(line.ledger.len(), 2);
    }

    #[test]
    fn test_double_posting_rejected_at_ordered_quantity() {
        let mut line = SimLine::new(50);
        line.post(50).unwrap();

        // The same delivered quantity posted again must not double-credit
        let err = line.post(50).unwrap_err();
        assert_eq!(
            err,
            PostError::OverPosting {
                ordered: 50,
                posted: 50,
                requested: 50
            }
        );
        assert_eq!(line.stock, 50);
        assert_eq!(line.ledger.len(), 1);
    }

    #[test]
    fn test_posting_beyond_remaining_rejected() {
        let mut line = SimLine::new(50);
        line.post(30).unwrap();

        let err = line.post(21).unwrap_err();
        assert_eq!(
            err,
            PostError::OverPosting {
                ordered: 50,
                posted: 30,
                requested: 21
            }
        );
        // The failed attempt changes nothing
        assert_eq!(line.posted_qty, 30);
        assert_eq!(line.stock, 30);
    }

    #[test]
    fn test_non_positive_posting_rejected() {
        let mut line = SimLine::new(50);
        assert_eq!(line.post(0).unwrap_err(), PostError::InvalidQuantity);
        assert_eq!(line.post(-5).unwrap_err(), PostError::InvalidQuantity);
        assert_eq!(line.posted_qty, 0);
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

        /// Whatever sequence of postings arrives, the posted total never
        /// exceeds the ordered quantity
        #[test]
        fn prop_posted_never_exceeds_ordered(
            ordered in 1i32..=1000,
            postings in prop::collection::vec(1i32..=200, 1..30)
        ) {
            let mut line = SimLine::new(ordered);
            for qty in postings {
                let _ = line.post(qty);
                prop_assert!(line.posted_qty <= line.ordered_qty);
            }
        }

        /// Stock credited equals quantity posted, and the ledger records
        /// exactly one stock_in entry per successful posting
        #[test]
        fn prop_stock_matches_posted_total(
            ordered in 1i32..=1000,
            postings in prop::collection::vec(1i32..=200, 1..30)
        ) {
            let mut line = SimLine::new(ordered);
            let mut successes = 0;
            for qty in postings {
                if line.post(qty).is_ok() {
                    successes += 1;
                }
            }

            prop_assert_eq!(line.stock, line.posted_qty);
            prop_assert_eq!(line.ledger.len(), successes);

            let ledger_total: i32 = line.ledger.iter().map(|(_, q)| q).sum();
            prop_assert_eq!(ledger_total, line.posted_qty);
        }

        /// Once fully posted, every further posting fails
        #[test]
        fn prop_fully_posted_line_is_closed(
            ordered in 1i32..=500,
            extra in 1i32..=100
        ) {
            let mut line = SimLine::new(ordered);
            line.post(ordered).unwrap();

            prop_assert!(line.post(extra).is_err());
            prop_assert_eq!(line.posted_qty, ordered);
        }
    }
}
