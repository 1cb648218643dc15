//! # freegift-engine: Evaluation Pass & Collaborators
//!
//! Everything that touches the outside of a cart: catalog and inventory
//! lookups, the rule evaluator with its action handlers, the reorder hooks,
//! admin save validation, configuration and logging setup.
//!
//! ## Evaluation Pass
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Cart + [PromotionRule]                                                │
//! │        │                                                                │
//! │        ▼                                                                │
//! │   RuleEvaluator::run_pass ──────────────────────────────┐               │
//! │        │                                                │               │
//! │        ├── GiftProvisioner::before_pass  (reset gifts)  │               │
//! │        │                                                │               │
//! │        └── GiftProvisioner::apply ──► Catalog           │               │
//! │                    │                  Inventory         │               │
//! │                    ▼                                    ▼               │
//! │              gift CartLine                          PassReport          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use freegift_core::{Cart, CartLine, Product, PromotionRule, StoreId};
//! use freegift_engine::{Catalog, GiftProvisioner, InMemoryCatalog, RuleEvaluator};
//!
//! let mut catalog = InMemoryCatalog::new();
//! catalog.insert_stocked(Product::new("A", "Widget", 1000), 10);
//! catalog.insert_stocked(Product::new("FREE1", "Tote bag", 1500), 10);
//!
//! let widget = catalog.get_by_sku("A").unwrap();
//! let mut cart = Cart::new(StoreId::default());
//! cart.add_line(CartLine::from_product(&widget, StoreId::default(), 2));
//!
//! let mut rules = vec![PromotionRule::gift("R1", "FREE1", 3.0)];
//! let evaluator = RuleEvaluator::new().with_handler(GiftProvisioner::new(&catalog, &catalog));
//! let report = evaluator.run_pass(&mut cart, &mut rules).unwrap();
//!
//! assert_eq!(report.granted.len(), 1);
//! assert_eq!(cart.line_count(), 2);
//! assert_eq!(cart.subtotal().cents(), 2000);
//! ```

pub mod admin;
pub mod catalog;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod handler;
pub mod provisioner;
pub mod reorder;
pub mod scenario;
pub mod telemetry;

pub use admin::{validate_rule_save, RuleForm, RuleSaveError};
pub use catalog::{Catalog, InMemoryCatalog, Inventory};
pub use config::{EngineConfig, GiftSettings, LoggingSettings, StoreSettings};
pub use error::{EngineError, EngineResult};
pub use evaluator::{GrantedGift, PassReport, RuleEvaluator};
pub use handler::{ActionOutcome, RuleActionHandler};
pub use provisioner::GiftProvisioner;
pub use reorder::{reorder, reorder_line, OrderLineRecord};
pub use scenario::{Scenario, SimulationOutcome};
pub use telemetry::init_tracing;
