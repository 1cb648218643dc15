//! # Error Types
//!
//! Domain-specific error types for freegift-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  freegift-core errors (this file)                                      │
//! │  ├── CoreError        - Runtime domain failures                        │
//! │  └── ValidationError  - Field validation failures                      │
//! │                                                                         │
//! │  freegift-engine errors (separate crate)                               │
//! │  ├── EngineError      - Config, reorder, wrapped CoreError             │
//! │  └── RuleSaveError    - Admin save rejected (keeps the form)           │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → EngineError → host platform       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Not every "nothing happened" is an error: a consumed rule or a
//! non-positive gift quantity is a silent no-op and never reaches this file.

use thiserror::Error;

use crate::cart::LineId;

// =============================================================================
// Core Error
// =============================================================================

/// Core domain errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A SKU did not resolve to a product that can be handed out.
    ///
    /// ## When This Occurs
    /// - The gift SKU was valid at rule save time but the product has since
    ///   been deleted
    /// - The product exists but has no stock item, so downstream stock
    ///   deduction would not recognize the line
    ///
    /// ## User Workflow
    /// ```text
    /// Totals recalculation
    ///      │
    ///      ▼
    /// Rule "R1" grants gift "FREE1"
    ///      │
    ///      ▼
    /// Catalog: no product with sku FREE1
    ///      │
    ///      ▼
    /// ProductLookup { sku: "FREE1" } → generic cart failure
    /// ```
    #[error("Product lookup failed for SKU {sku}")]
    ProductLookup { sku: String },

    /// A line id is not present in the cart.
    #[error("Cart line not found: {0}")]
    LineNotFound(LineId),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Shorthand for a failed SKU lookup.
    pub fn product_lookup(sku: impl Into<String>) -> Self {
        CoreError::ProductLookup { sku: sku.into() }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised by the admin save hook before a rule is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. characters not allowed in a SKU).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The configured gift SKU does not reference a catalog product.
    #[error("The free product SKU must be a valid product.")]
    UnknownGiftSku { sku: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
