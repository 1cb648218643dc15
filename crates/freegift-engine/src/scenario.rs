//! # Simulation Scenarios
//!
//! A JSON description of a catalog, a cart and a rule set, used by the
//! `simulate` binary to run one evaluation pass outside a host platform.
//!
//! ```json
//! {
//!   "store_id": "default",
//!   "products": [
//!     { "sku": "A", "name": "Widget", "price_cents": 1000 },
//!     { "sku": "FREE1", "name": "Tote bag", "price_cents": 1500 }
//!   ],
//!   "stock": [{ "sku": "A", "qty": 10 }, { "sku": "FREE1", "qty": 10 }],
//!   "cart": [{ "sku": "A", "qty": 2 }],
//!   "rules": [
//!     { "id": "R1", "name": "Free tote", "action": "add_gift",
//!       "gift_sku": "FREE1", "discount_amount": 3 }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use freegift_core::cart::CartTotals;
use freegift_core::validation::{validate_quantity, validate_sku};
use freegift_core::{Cart, CartLine, CoreError, Product, PromotionRule, StockItem, StoreId};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::{Catalog, InMemoryCatalog};
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::evaluator::{PassReport, RuleEvaluator};
use crate::provisioner::GiftProvisioner;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioProduct {
    pub sku: String,
    pub name: String,
    pub price_cents: i64,
    #[serde(default)]
    pub tax_rate_bps: u32,
    #[serde(default)]
    pub weight_grams: i64,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioStock {
    pub sku: String,
    pub qty: i64,
    #[serde(default = "default_true")]
    pub manage_stock: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioLine {
    pub sku: String,
    pub qty: i64,
    #[serde(default)]
    pub custom: BTreeMap<String, String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    /// Falls back to the configured default store.
    #[serde(default)]
    pub store_id: Option<String>,
    #[serde(default)]
    pub products: Vec<ScenarioProduct>,
    #[serde(default)]
    pub stock: Vec<ScenarioStock>,
    #[serde(default)]
    pub cart: Vec<ScenarioLine>,
    #[serde(default)]
    pub rules: Vec<PromotionRule>,
}

/// Result of running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationOutcome {
    pub cart: Cart,
    pub totals: CartTotals,
    pub report: PassReport,
}

impl Scenario {
    pub fn from_json(raw: &str) -> EngineResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> EngineResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    /// Builds the in-memory catalog. Stock entries for unknown SKUs are
    /// lookup failures.
    pub fn catalog(&self) -> EngineResult<InMemoryCatalog> {
        let mut catalog = InMemoryCatalog::new();

        for entry in &self.products {
            validate_sku(&entry.sku).map_err(CoreError::from)?;
            let mut product = Product::new(entry.sku.clone(), entry.name.clone(), entry.price_cents);
            product.tax_rate_bps = entry.tax_rate_bps;
            product.weight_grams = entry.weight_grams;
            product.is_active = entry.is_active;
            catalog.insert(product);
        }

        for entry in &self.stock {
            let product_id = catalog
                .id_by_sku(&entry.sku)
                .ok_or_else(|| CoreError::product_lookup(&entry.sku))?;
            catalog.set_stock(StockItem {
                product_id,
                qty: entry.qty,
                is_in_stock: entry.qty > 0,
                manage_stock: entry.manage_stock,
            });
        }

        Ok(catalog)
    }

    /// Builds the starting cart from the scenario lines.
    pub fn build_cart(&self, catalog: &dyn Catalog, store_id: StoreId) -> EngineResult<Cart> {
        let mut cart = Cart::new(store_id.clone());

        for entry in &self.cart {
            validate_quantity(entry.qty).map_err(CoreError::from)?;
            let product = catalog
                .get_by_sku(&entry.sku)
                .ok_or_else(|| CoreError::product_lookup(&entry.sku))?;

            let mut line = CartLine::from_product(&product, store_id.clone(), entry.qty);
            line.options.custom = entry.custom.clone();
            cart.add_line(line);
        }

        Ok(cart)
    }

    /// Runs one evaluation pass with the gift handler registered.
    pub fn run(&self, config: &EngineConfig) -> EngineResult<SimulationOutcome> {
        let catalog = self.catalog()?;
        let store_id = self
            .store_id
            .as_deref()
            .map(StoreId::from)
            .unwrap_or_else(|| config.default_store());

        let mut cart = self.build_cart(&catalog, store_id)?;
        let mut rules = self.rules.clone();

        let evaluator = RuleEvaluator::new().with_handler(GiftProvisioner::new(&catalog, &catalog));
        let report = evaluator.run_pass(&mut cart, &mut rules)?;

        let totals = CartTotals::from(&cart);
        info!(
            lines = totals.line_count,
            gifts = totals.gift_line_count,
            subtotal_cents = totals.subtotal_cents,
            "Scenario evaluated"
        );

        Ok(SimulationOutcome {
            cart,
            totals,
            report,
        })
    }
}
