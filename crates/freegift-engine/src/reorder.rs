//! # Reorder
//!
//! Rebuilds cart lines from persisted order lines. The order line does not
//! carry `is_gift`; the flag travels through the serialized buy request and
//! the product instance:
//!
//! ```text
//! OrderLineRecord.buy_request_json  {"qty":3,"is_free_product":true}
//!        │
//!        ▼  detect_free_product_on_option_rebuild
//! Product.is_free_product = true
//!        │
//!        ▼  CartLine::from_product + propagate_free_flag_to_line
//! CartLine.is_gift = true, price 0, fresh gift token
//!        │
//!        ▼
//! cart.add_line
//! ```

use freegift_core::validation::validate_quantity;
use freegift_core::{BuyRequest, Cart, CartLine, CoreError, LineId, Product};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::error::{EngineError, EngineResult};

/// A line of a placed order, as stored by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineRecord {
    pub sku: String,
    pub product_id: String,
    pub name: String,
    pub qty_ordered: i64,
    /// Unit price actually charged.
    pub price_cents: i64,
    /// Serialized [`BuyRequest`]; older records may not have one.
    #[serde(default)]
    pub buy_request_json: Option<String>,
}

impl OrderLineRecord {
    /// Snapshots a cart line at order placement.
    pub fn from_cart_line(line: &CartLine) -> EngineResult<Self> {
        let buy_request_json = line
            .options
            .buy_request
            .as_ref()
            .map(BuyRequest::to_json)
            .transpose()?;

        Ok(OrderLineRecord {
            sku: line.sku.clone(),
            product_id: line.product_id.clone(),
            name: line.name.clone(),
            qty_ordered: line.quantity,
            price_cents: line.unit_price().cents(),
            buy_request_json,
        })
    }

    /// Parses the stored buy request, defaulting to a paid request for the
    /// ordered quantity when none was stored.
    pub fn buy_request(&self) -> EngineResult<BuyRequest> {
        match &self.buy_request_json {
            Some(raw) => BuyRequest::from_json(raw).map_err(|e| EngineError::Reorder {
                sku: self.sku.clone(),
                reason: format!("buy request is not valid JSON ({e})"),
            }),
            None => Ok(BuyRequest::new(self.qty_ordered)),
        }
    }
}

/// Marks `product` free when the buy request it is rebuilt from says so.
pub fn detect_free_product_on_option_rebuild(product: &mut Product, request: &BuyRequest) {
    if request.is_free_product {
        debug!(sku = %product.sku, "Buy request marks product as free");
        product.is_free_product = true;
    }
}

/// Copies the product's free marker onto a freshly built line.
///
/// A free line gets gift pricing and its own gift token.
pub fn propagate_free_flag_to_line(line: &mut CartLine, product: &Product) {
    line.is_gift = product.is_free_product;
    if line.is_gift {
        line.mark_as_gift();
    }
}

/// Rebuilds one order line into `cart`.
///
/// ## Errors
/// - `Reorder` if the stored buy request is malformed or the quantity is invalid
/// - `Core(ProductLookup)` if the SKU no longer resolves
pub fn reorder_line(
    cart: &mut Cart,
    record: &OrderLineRecord,
    catalog: &dyn Catalog,
) -> EngineResult<LineId> {
    validate_quantity(record.qty_ordered).map_err(|e| EngineError::Reorder {
        sku: record.sku.clone(),
        reason: e.to_string(),
    })?;

    let request = record.buy_request()?;
    let mut product = catalog
        .get_by_sku(&record.sku)
        .ok_or_else(|| CoreError::product_lookup(&record.sku))?;

    detect_free_product_on_option_rebuild(&mut product, &request);

    let mut line = CartLine::from_product(&product, cart.store_id.clone(), record.qty_ordered);
    propagate_free_flag_to_line(&mut line, &product);

    let is_gift = line.is_gift;
    let line_id = cart.add_line(line);

    info!(sku = %record.sku, qty = record.qty_ordered, is_gift, line = %line_id, "Order line reordered");
    Ok(line_id)
}

/// Rebuilds every order line, stopping at the first failure.
pub fn reorder(
    cart: &mut Cart,
    records: &[OrderLineRecord],
    catalog: &dyn Catalog,
) -> EngineResult<Vec<LineId>> {
    records
        .iter()
        .map(|record| reorder_line(cart, record, catalog))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::provisioner::GiftProvisioner;
    use freegift_core::StoreId;

    fn catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert_stocked(Product::new("A", "Widget", 1000), 50);
        catalog.insert_stocked(Product::new("FREE1", "Tote bag", 1500), 50);
        catalog
    }

    fn record(sku: &str, qty: i64, buy_request_json: Option<&str>) -> OrderLineRecord {
        OrderLineRecord {
            sku: sku.into(),
            product_id: String::new(),
            name: sku.into(),
            qty_ordered: qty,
            price_cents: 0,
            buy_request_json: buy_request_json.map(String::from),
        }
    }

    #[test]
    fn test_gift_survives_reorder() {
        let catalog = catalog();
        let provisioner = GiftProvisioner::new(&catalog, &catalog);
        let gift = provisioner
            .build_gift_line("FREE1", StoreId::default(), 3)
            .unwrap();
        let stored = OrderLineRecord::from_cart_line(&gift).unwrap();
        assert_eq!(stored.price_cents, 0);

        let mut cart = Cart::new(StoreId::default());
        let id = reorder_line(&mut cart, &stored, &catalog).unwrap();

        let line = cart.line(id).unwrap();
        assert!(line.is_gift);
        assert_eq!(line.quantity, 3);
        assert_eq!(line.unit_price().cents(), 0);
        assert_eq!(line.custom_price_cents, Some(0));
        assert!(line.options.gift_token.is_some());
        assert_ne!(line.options.gift_token, gift.options.gift_token);
    }

    #[test]
    fn test_paid_line_reorders_at_catalog_price() {
        let catalog = catalog();
        let mut cart = Cart::new(StoreId::default());

        let id = reorder_line(&mut cart, &record("A", 2, Some(r#"{"qty":2}"#)), &catalog).unwrap();

        let line = cart.line(id).unwrap();
        assert!(!line.is_gift);
        assert_eq!(line.row_total().cents(), 2000);
    }

    #[test]
    fn test_missing_buy_request_is_paid() {
        let catalog = catalog();
        let mut cart = Cart::new(StoreId::default());

        let id = reorder_line(&mut cart, &record("FREE1", 1, None), &catalog).unwrap();

        assert!(!cart.line(id).unwrap().is_gift);
    }

    #[test]
    fn test_malformed_buy_request() {
        let catalog = catalog();
        let mut cart = Cart::new(StoreId::default());

        let err = reorder_line(&mut cart, &record("FREE1", 1, Some("{qty:")), &catalog).unwrap_err();

        assert!(matches!(err, EngineError::Reorder { ref sku, .. } if sku == "FREE1"));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_deleted_product() {
        let mut catalog = catalog();
        catalog.remove("FREE1");
        let mut cart = Cart::new(StoreId::default());

        let err = reorder_line(&mut cart, &record("FREE1", 1, None), &catalog).unwrap_err();
        assert!(err.is_product_lookup());
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let catalog = catalog();
        let mut cart = Cart::new(StoreId::default());

        let err = reorder_line(&mut cart, &record("A", 0, None), &catalog).unwrap_err();
        assert!(matches!(err, EngineError::Reorder { .. }));
    }

    #[test]
    fn test_two_gifts_of_same_sku_stay_separate() {
        let catalog = catalog();
        let free = r#"{"qty":1,"is_free_product":true}"#;
        let records = vec![record("FREE1", 1, Some(free)), record("FREE1", 1, Some(free))];
        let mut cart = Cart::new(StoreId::default());

        let ids = reorder(&mut cart, &records, &catalog).unwrap();

        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);
        assert_eq!(cart.gift_lines().count(), 2);
    }

    #[test]
    fn test_detect_free_product() {
        let mut product = Product::new("FREE1", "Tote bag", 1500);

        detect_free_product_on_option_rebuild(&mut product, &BuyRequest::new(1));
        assert!(!product.is_free_product);

        detect_free_product_on_option_rebuild(&mut product, &BuyRequest::free(1));
        assert!(product.is_free_product);
    }

    #[test]
    fn test_propagate_keeps_reference_price() {
        let mut product = Product::new("FREE1", "Tote bag", 1500);
        product.is_free_product = true;
        let mut line = CartLine::from_product(&product, StoreId::default(), 2);

        propagate_free_flag_to_line(&mut line, &product);

        assert!(line.is_gift);
        assert_eq!(line.reference_price().cents(), 1500);
        assert_eq!(line.options.buy_request, Some(BuyRequest::free(2)));
    }
}
