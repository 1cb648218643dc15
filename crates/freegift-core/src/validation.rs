//! # Validation Module
//!
//! Field validation for rule configuration and cart input.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Admin form (host UI)                                         │
//! │  └── Required-field hints                                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (pure field checks)                              │
//! │  ├── Catalog SKU shape                                                  │
//! │  └── Quantity ranges                                                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: freegift-engine admin hook                                   │
//! │  └── Gift SKU resolves to a catalog product                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use freegift_core::validation::{validate_gift_quantity, validate_sku};
//!
//! assert!(validate_sku("FREE-TOTE").is_ok());
//! assert!(validate_gift_quantity(3, 999).is_ok());
//! ```

use crate::error::ValidationError;
use crate::MAX_ITEM_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Maximum SKU length accepted.
const MAX_SKU_LEN: usize = 64;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product SKU.
///
/// ## Rules
/// - Must not be empty (after trimming)
/// - At most 64 characters
/// - Letters, numbers, `.`, `-` and `_` only
///
/// ## Example
/// ```rust
/// use freegift_core::validation::validate_sku;
///
/// assert!(validate_sku("TOTE-BLK").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("has space").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > MAX_SKU_LEN {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: MAX_SKU_LEN,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, dots, hyphens, and underscores"
                .to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a gift rule's quantity against the configured ceiling.
///
/// Only the upper bound is enforced. A zero or negative quantity saves and
/// grants nothing at evaluation time.
pub fn validate_gift_quantity(qty: i64, max: i64) -> ValidationResult<()> {
    if qty > max {
        return Err(ValidationError::OutOfRange {
            field: "discount_amount".to_string(),
            min: 0,
            max,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("TOTE-BLK").is_ok());
        assert!(validate_sku("MUG12").is_ok());
        assert!(validate_sku("gift_1.v2").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_gift_quantity() {
        assert!(validate_gift_quantity(1, 10).is_ok());
        assert!(validate_gift_quantity(10, 10).is_ok());
        assert!(validate_gift_quantity(0, 10).is_ok());
        assert!(validate_gift_quantity(-3, 10).is_ok());
        assert!(matches!(
            validate_gift_quantity(11, 10),
            Err(ValidationError::OutOfRange { max: 10, .. })
        ));
    }
}
