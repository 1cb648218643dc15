//! # Catalog & Inventory Collaborators
//!
//! The engine never owns product data. It asks the host through two narrow
//! traits:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  GiftProvisioner ──► Catalog::get_by_sku("FREE1") ──► Product           │
//! │        │                                                                │
//! │        └──────────► Inventory::assign_stock(&mut product)               │
//! │                         └─► product.stock = Some(StockItem)             │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`InMemoryCatalog`] implements both and backs the simulator and tests.

use std::collections::HashMap;

use freegift_core::{CoreError, CoreResult, Product, StockItem};
use tracing::debug;

/// Product lookup by SKU.
pub trait Catalog {
    /// Loads a product by SKU. `None` when no such product exists.
    fn get_by_sku(&self, sku: &str) -> Option<Product>;

    /// Resolves a SKU to a product id.
    fn id_by_sku(&self, sku: &str) -> Option<String> {
        self.get_by_sku(sku).map(|product| product.id)
    }
}

/// Stock records keyed by product id.
pub trait Inventory {
    fn stock_item(&self, product_id: &str) -> Option<StockItem>;

    /// Associates the product's stock record with the in-flight instance.
    ///
    /// Fails with `ProductLookup` when the product has no stock record.
    fn assign_stock(&self, product: &mut Product) -> CoreResult<()> {
        let stock = self
            .stock_item(&product.id)
            .ok_or_else(|| CoreError::product_lookup(&product.sku))?;
        product.stock = Some(stock);
        Ok(())
    }
}

/// HashMap-backed catalog and inventory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: HashMap<String, Product>,
    stock: HashMap<String, StockItem>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a product, keyed by SKU.
    pub fn insert(&mut self, product: Product) {
        debug!(sku = %product.sku, "Catalog product registered");
        self.products.insert(product.sku.clone(), product);
    }

    /// Inserts a product together with a managed stock record.
    pub fn insert_stocked(&mut self, product: Product, qty: i64) {
        self.set_stock(StockItem::managed(product.id.clone(), qty));
        self.insert(product);
    }

    pub fn set_stock(&mut self, stock: StockItem) {
        self.stock.insert(stock.product_id.clone(), stock);
    }

    /// Removes a product (and its stock record) by SKU.
    pub fn remove(&mut self, sku: &str) -> Option<Product> {
        let product = self.products.remove(sku)?;
        self.stock.remove(&product.id);
        Some(product)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

impl Catalog for InMemoryCatalog {
    fn get_by_sku(&self, sku: &str) -> Option<Product> {
        self.products.get(sku).cloned()
    }
}

impl Inventory for InMemoryCatalog {
    fn stock_item(&self, product_id: &str) -> Option<StockItem> {
        self.stock.get(product_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_sku() {
        let mut catalog = InMemoryCatalog::new();
        let tote = Product::new("FREE1", "Tote bag", 1500);
        let id = tote.id.clone();
        catalog.insert(tote);

        assert_eq!(catalog.id_by_sku("FREE1"), Some(id));
        assert!(catalog.get_by_sku("NOPE").is_none());
    }

    #[test]
    fn test_assign_stock() {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert_stocked(Product::new("FREE1", "Tote bag", 1500), 5);

        let mut product = catalog.get_by_sku("FREE1").unwrap();
        assert!(!product.has_stock_item());

        catalog.assign_stock(&mut product).unwrap();
        assert_eq!(product.stock.as_ref().map(|s| s.qty), Some(5));
    }

    #[test]
    fn test_assign_stock_without_record_fails() {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert(Product::new("DIGITAL", "E-book", 900));

        let mut product = catalog.get_by_sku("DIGITAL").unwrap();
        let err = catalog.assign_stock(&mut product).unwrap_err();
        assert!(matches!(err, CoreError::ProductLookup { sku } if sku == "DIGITAL"));
    }

    #[test]
    fn test_remove_drops_stock() {
        let mut catalog = InMemoryCatalog::new();
        let tote = Product::new("FREE1", "Tote bag", 1500);
        let id = tote.id.clone();
        catalog.insert_stocked(tote, 5);

        assert!(catalog.remove("FREE1").is_some());
        assert!(catalog.stock_item(&id).is_none());
        assert!(catalog.is_empty());
    }
}
