//! Validation rules for the Hotel Stock Management Platform

use rust_decimal::Decimal;

// ============================================================================
// Stock Validations
// ============================================================================

/// Validate a requested/distributed quantity (must be strictly positive)
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    Ok(())
}

/// Validate a manual adjustment delta (any sign, but never zero)
pub fn validate_adjustment_delta(delta: i32) -> Result<(), &'static str> {
    if delta == 0 {
        return Err("Adjustment delta must be non-zero");
    }
    Ok(())
}

/// Validate an initial stocked quantity or reorder threshold
pub fn validate_stock_level(level: i32) -> Result<(), &'static str> {
    if level < 0 {
        return Err("Stock level cannot be negative");
    }
    Ok(())
}

/// Validate a unit cost
pub fn validate_unit_cost(cost: Decimal) -> Result<(), &'static str> {
    if cost < Decimal::ZERO {
        return Err("Unit cost cannot be negative");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate an item name (non-empty after trimming)
pub fn validate_item_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Item name cannot be empty");
    }
    Ok(())
}

/// Validate a department name
pub fn validate_department(department: &str) -> Result<(), &'static str> {
    if department.trim().is_empty() {
        return Err("Department cannot be empty");
    }
    Ok(())
}

/// Case-insensitive exact item name match, as used for request/item binding
pub fn item_names_match(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
