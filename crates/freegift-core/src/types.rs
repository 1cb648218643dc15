//! # Domain Types
//!
//! Catalog-side types shared by carts and rules.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   StockItem     │   │    StoreId      │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  product_id     │   │  "default"      │       │
//! │  │  sku (business) │   │  qty            │   └─────────────────┘       │
//! │  │  price_cents    │   │  manage_stock   │                              │
//! │  │  stock ◄────────┼───┤  (assigned)     │                              │
//! │  │  is_free_product│   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `Product::stock` and `Product::is_free_product` are transient: they only
//! live on the in-flight instance and are never serialized.

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::DEFAULT_STORE_ID;

// =============================================================================
// Store
// =============================================================================

/// Store (website view) a cart or line belongs to.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct StoreId(String);

impl StoreId {
    pub fn new(id: impl Into<String>) -> Self {
        StoreId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for StoreId {
    fn default() -> Self {
        StoreId(DEFAULT_STORE_ID.to_string())
    }
}

impl From<&str> for StoreId {
    fn from(id: &str) -> Self {
        StoreId(id.to_string())
    }
}

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Stock Item
// =============================================================================

/// Inventory record associated with a product.
///
/// A gift line is only built for a product that carries one of these, so
/// downstream stock deduction recognizes the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StockItem {
    pub product_id: String,
    pub qty: i64,
    pub is_in_stock: bool,
    /// Whether stock levels are decremented on order placement.
    pub manage_stock: bool,
}

impl StockItem {
    /// A managed, in-stock record with the given quantity.
    pub fn managed(product_id: impl Into<String>, qty: i64) -> Self {
        StockItem {
            product_id: product_id.into(),
            qty,
            is_in_stock: qty > 0,
            manage_stock: true,
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name.
    pub name: String,

    /// Catalog price in cents.
    pub price_cents: i64,

    /// Unit weight in grams.
    #[serde(default)]
    pub weight_grams: i64,

    /// Tax rate in basis points (825 = 8.25%).
    #[serde(default)]
    pub tax_rate_bps: u32,

    /// Disabled products still resolve by SKU; status filtering is the
    /// catalog's business.
    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Stock record attached by the inventory collaborator.
    #[serde(skip)]
    #[ts(skip)]
    pub stock: Option<StockItem>,

    /// Marker set while a product is rebuilt from a free buy request.
    #[serde(skip)]
    #[ts(skip)]
    pub is_free_product: bool,
}

fn default_true() -> bool {
    true
}

impl Product {
    /// Creates an active product with a fresh id.
    pub fn new(sku: impl Into<String>, name: impl Into<String>, price_cents: i64) -> Self {
        Product {
            id: Uuid::new_v4().to_string(),
            sku: sku.into(),
            name: name.into(),
            price_cents,
            weight_grams: 0,
            tax_rate_bps: 0,
            is_active: true,
            stock: None,
            is_free_product: false,
        }
    }

    /// Catalog price.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Whether an inventory record has been associated with this instance.
    #[inline]
    pub fn has_stock_item(&self) -> bool {
        self.stock.is_some()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
