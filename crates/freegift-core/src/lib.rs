//! # freegift-core: Pure Domain Model for the Free-Gift Promotion
//!
//! This crate holds the types a cart-evaluation pass works on. It has zero
//! I/O dependencies: catalog and inventory lookups live in `freegift-engine`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Free-Gift Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  Host platform (checkout)                       │   │
//! │  │     totals recalculation ──► evaluation pass ──► totals         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    freegift-engine                              │   │
//! │  │   RuleEvaluator, GiftProvisioner, reorder hooks, config         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ freegift-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │   rule    │  │   │
//! │  │   │  Product  │  │   Money   │  │   Cart    │  │ Promotion │  │   │
//! │  │   │ StockItem │  │           │  │ CartLine  │  │   Rule    │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CATALOG • NO LOGGING SETUP                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Catalog-side types (Product, StockItem, StoreId)
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - Cart, CartLine and the typed option bag
//! - [`rule`] - Promotion rules, actions and item conditions
//! - [`error`] - Domain error types
//! - [`validation`] - Field validation
//!
//! ## Example Usage
//!
//! ```rust
//! use freegift_core::{Cart, CartLine, Product, StoreId};
//!
//! let product = Product::new("A", "Widget", 1250);
//! let mut cart = Cart::new(StoreId::from("default"));
//! cart.add_line(CartLine::from_product(&product, StoreId::from("default"), 2));
//!
//! assert_eq!(cart.line_count(), 1);
//! assert_eq!(cart.subtotal().cents(), 2500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod rule;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{BuyRequest, Cart, CartLine, GiftToken, LineId, LineOptions};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use rule::{ItemCondition, PromotionRule, RuleId, SimpleAction};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default store for carts created without an explicit store context.
pub const DEFAULT_STORE_ID: &str = "default";

/// Maximum quantity of a single line.
///
/// Also the default ceiling for a gift rule's quantity at save time.
pub const MAX_ITEM_QUANTITY: i64 = 999;
