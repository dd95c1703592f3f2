//! Validation utilities for the inventory management backend
//!
//! Pure field checks shared by the service layer; every rejection here
//! happens before a transaction starts.

use rust_decimal::Decimal;

use crate::reconcile::LineOp;

/// Longest accepted name/contact field
pub const MAX_FIELD_LEN: usize = 100;

/// Largest accepted stock level or line quantity
pub const MAX_UNITS: i64 = i32::MAX as i64;

/// Exclusive upper bound for unit prices, keeping totals within ten digits
pub const MAX_PRICE: i64 = 100_000_000;

// ============================================================================
// Catalog Field Validations
// ============================================================================

/// Validate a required name field (category, supplier, client, product)
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty");
    }
    if name.len() > MAX_FIELD_LEN {
        return Err("Name is too long");
    }
    Ok(())
}

/// Validate a required contact field (supplier, client)
pub fn validate_contact(contact: &str) -> Result<(), &'static str> {
    if contact.trim().is_empty() {
        return Err("Contact cannot be empty");
    }
    if contact.len() > MAX_FIELD_LEN {
        return Err("Contact is too long");
    }
    Ok(())
}

/// Validate a username
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.trim().is_empty() {
        return Err("Username cannot be empty");
    }
    if username.len() > MAX_FIELD_LEN {
        return Err("Username is too long");
    }
    if username.chars().any(char::is_whitespace) {
        return Err("Username cannot contain whitespace");
    }
    Ok(())
}

/// Validate a product price
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    if price >= Decimal::from(MAX_PRICE) {
        return Err("Price is too large");
    }
    Ok(())
}

/// Validate an initial or updated stock level
pub fn validate_stock(stock: i64) -> Result<(), &'static str> {
    if stock < 0 {
        return Err("Stock cannot be negative");
    }
    if stock > MAX_UNITS {
        return Err("Stock is too large");
    }
    Ok(())
}

// ============================================================================
// Line Item Validations
// ============================================================================

/// Validate a line quantity (all movement quantities are strictly positive)
pub fn validate_quantity(quantity: i64) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be positive");
    }
    if quantity > MAX_UNITS {
        return Err("Quantity is too large");
    }
    Ok(())
}

/// Validate a single batch operation's fields
pub fn validate_line_op(op: &LineOp) -> Result<(), &'static str> {
    match op {
        LineOp::New { quantity, .. } | LineOp::Edit { quantity, .. } => {
            validate_quantity(*quantity)
        }
        LineOp::Delete { .. } => Ok(()),
    }
}
