//! # Rule Evaluator
//!
//! Runs one evaluation pass over a cart.
//!
//! ## Pass Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. before_pass hooks        (gift reset happens here)                  │
//! │  2. rule.consumed = false    for every rule                             │
//! │  3. snapshot line ids                                                   │
//! │  4. for line in snapshot                                                │
//! │        for rule in active rules by sort_order                           │
//! │           matches? ──► handler accepts? ──► apply                       │
//! │           stop_rules_processing? ──► next line                          │
//! │  5. PassReport                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Lines created during the pass are outside the snapshot, so a granted
//! gift is never evaluated in the pass that created it. Actions without a
//! registered handler are pricing actions handled elsewhere; they still
//! honor `stop_rules_processing`.

use freegift_core::{Cart, LineId, PromotionRule, RuleId, SimpleAction};
use serde::Serialize;
use tracing::{debug, info, trace};

use crate::error::EngineResult;
use crate::handler::{ActionOutcome, RuleActionHandler};

/// One gift granted during a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GrantedGift {
    pub rule_id: RuleId,
    pub line_id: LineId,
    pub sku: String,
    pub quantity: i64,
}

/// Summary of one evaluation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Gift lines removed by the reset before evaluation.
    pub removed_gift_lines: usize,
    pub granted: Vec<GrantedGift>,
}

/// Dispatches matched (line, rule) pairs to action handlers.
#[derive(Default)]
pub struct RuleEvaluator<'a> {
    handlers: Vec<Box<dyn RuleActionHandler + 'a>>,
}

impl<'a> RuleEvaluator<'a> {
    pub fn new() -> Self {
        RuleEvaluator {
            handlers: Vec::new(),
        }
    }

    /// Registers a handler. A later handler for the same action replaces
    /// the earlier one.
    pub fn register(&mut self, handler: impl RuleActionHandler + 'a) {
        let action = handler.action();
        self.handlers.retain(|existing| existing.action() != action);
        self.handlers.push(Box::new(handler));
    }

    /// Builder-style [`register`](Self::register).
    pub fn with_handler(mut self, handler: impl RuleActionHandler + 'a) -> Self {
        self.register(handler);
        self
    }

    pub fn handler_for(&self, action: SimpleAction) -> Option<&(dyn RuleActionHandler + 'a)> {
        self.handlers
            .iter()
            .find(|handler| handler.action() == action)
            .map(|handler| handler.as_ref())
    }

    /// Runs one evaluation pass.
    ///
    /// A handler error aborts the pass and is returned as-is; lines granted
    /// before the failure stay in the cart until the next pass resets them.
    pub fn run_pass(
        &self,
        cart: &mut Cart,
        rules: &mut [PromotionRule],
    ) -> EngineResult<PassReport> {
        let mut report = PassReport::default();

        let gifts_before = cart.gift_lines().count();
        for handler in &self.handlers {
            handler.before_pass(cart)?;
        }
        report.removed_gift_lines = gifts_before.saturating_sub(cart.gift_lines().count());

        for rule in rules.iter_mut() {
            rule.consumed = false;
        }

        let mut order: Vec<usize> = (0..rules.len()).filter(|&i| rules[i].is_active).collect();
        order.sort_by_key(|&i| rules[i].sort_order);

        let snapshot = cart.line_ids();
        debug!(
            lines = snapshot.len(),
            rules = order.len(),
            "Starting evaluation pass"
        );

        for line_id in snapshot {
            for &index in &order {
                let rule = &mut rules[index];
                let Some(line) = cart.line(line_id) else {
                    break;
                };
                if !rule.matches(line) {
                    continue;
                }

                match self.handler_for(rule.action) {
                    Some(handler) if handler.accepts(line) => {
                        if let ActionOutcome::LineAdded(added) = handler.apply(cart, line_id, rule)? {
                            if let Some(gift) = cart.line(added) {
                                report.granted.push(GrantedGift {
                                    rule_id: rule.id.clone(),
                                    line_id: added,
                                    sku: gift.sku.clone(),
                                    quantity: gift.quantity,
                                });
                            }
                        }
                    }
                    Some(_) => {
                        trace!(rule_id = %rule.id, line = %line_id, "Handler declined line");
                    }
                    None => {
                        trace!(rule_id = %rule.id, action = %rule.action, "No handler for action");
                    }
                }

                if rule.stop_rules_processing {
                    debug!(rule_id = %rule.id, line = %line_id, "Stopping rule processing for line");
                    break;
                }
            }
        }

        info!(
            removed = report.removed_gift_lines,
            granted = report.granted.len(),
            "Evaluation pass complete"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::InMemoryCatalog;
    use crate::provisioner::GiftProvisioner;
    use freegift_core::{CartLine, ItemCondition, Product, StoreId};

    fn catalog() -> InMemoryCatalog {
        let mut catalog = InMemoryCatalog::new();
        catalog.insert_stocked(Product::new("A", "Widget", 1000), 50);
        catalog.insert_stocked(Product::new("B", "Gadget", 2500), 50);
        catalog.insert_stocked(Product::new("FREE1", "Tote bag", 1500), 50);
        catalog.insert_stocked(Product::new("FREE2", "Sticker", 100), 50);
        catalog
    }

    fn cart(catalog: &InMemoryCatalog, items: &[(&str, i64)]) -> Cart {
        use crate::catalog::Catalog;

        let mut cart = Cart::new(StoreId::default());
        for (sku, qty) in items {
            let product = catalog.get_by_sku(sku).unwrap();
            cart.add_line(CartLine::from_product(&product, StoreId::default(), *qty));
        }
        cart
    }

    #[test]
    fn test_pass_grants_once_per_rule() {
        let catalog = catalog();
        let evaluator = RuleEvaluator::new().with_handler(GiftProvisioner::new(&catalog, &catalog));
        let mut cart = cart(&catalog, &[("A", 2), ("B", 1)]);
        let mut rules = vec![PromotionRule::gift("R1", "FREE1", 1.0)];

        let report = evaluator.run_pass(&mut cart, &mut rules).unwrap();

        // Both lines match; the rule is consumed after the first.
        assert_eq!(report.granted.len(), 1);
        assert_eq!(report.granted[0].sku, "FREE1");
        assert_eq!(cart.gift_lines().count(), 1);
        assert!(rules[0].consumed);
    }

    #[test]
    fn test_repeated_passes_are_stable() {
        let catalog = catalog();
        let evaluator = RuleEvaluator::new().with_handler(GiftProvisioner::new(&catalog, &catalog));
        let mut cart = cart(&catalog, &[("A", 2)]);
        let mut rules = vec![PromotionRule::gift("R1", "FREE1", 3.0)];

        evaluator.run_pass(&mut cart, &mut rules).unwrap();
        let report = evaluator.run_pass(&mut cart, &mut rules).unwrap();

        assert_eq!(report.removed_gift_lines, 1);
        assert_eq!(report.granted.len(), 1);
        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.total_quantity(), 5);
        assert_eq!(cart.subtotal().cents(), 2000);
    }

    #[test]
    fn test_inactive_rules_are_skipped() {
        let catalog = catalog();
        let evaluator = RuleEvaluator::new().with_handler(GiftProvisioner::new(&catalog, &catalog));
        let mut cart = cart(&catalog, &[("A", 1)]);
        let mut rule = PromotionRule::gift("R1", "FREE1", 1.0);
        rule.is_active = false;
        let mut rules = vec![rule];

        let report = evaluator.run_pass(&mut cart, &mut rules).unwrap();

        assert!(report.granted.is_empty());
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_conditions_select_trigger() {
        let catalog = catalog();
        let evaluator = RuleEvaluator::new().with_handler(GiftProvisioner::new(&catalog, &catalog));
        let mut cart = cart(&catalog, &[("A", 1)]);
        let mut rules = vec![
            PromotionRule::gift("R1", "FREE1", 1.0).with_condition(ItemCondition::Sku("B".into())),
            PromotionRule::gift("R2", "FREE2", 1.0).with_condition(ItemCondition::MinQuantity(1)),
        ];

        let report = evaluator.run_pass(&mut cart, &mut rules).unwrap();

        assert_eq!(report.granted.len(), 1);
        assert_eq!(report.granted[0].rule_id, RuleId::from("R2"));
        assert!(!rules[0].consumed);
    }

    #[test]
    fn test_sort_order_and_stop_rules_processing() {
        let catalog = catalog();
        let evaluator = RuleEvaluator::new().with_handler(GiftProvisioner::new(&catalog, &catalog));
        let mut cart = cart(&catalog, &[("A", 1)]);

        let mut late = PromotionRule::gift("LATE", "FREE2", 1.0);
        late.sort_order = 10;
        let mut first = PromotionRule::gift("FIRST", "FREE1", 1.0);
        first.sort_order = 1;
        first.stop_rules_processing = true;
        let mut rules = vec![late, first];

        let report = evaluator.run_pass(&mut cart, &mut rules).unwrap();

        assert_eq!(report.granted.len(), 1);
        assert_eq!(report.granted[0].rule_id, RuleId::from("FIRST"));
        assert!(!rules[0].consumed);
    }

    #[test]
    fn test_stop_flag_on_unhandled_action_still_stops() {
        let catalog = catalog();
        let evaluator = RuleEvaluator::new().with_handler(GiftProvisioner::new(&catalog, &catalog));
        let mut cart = cart(&catalog, &[("A", 1)]);

        let mut pricing = PromotionRule::new("P1", "10% off", SimpleAction::ByPercent);
        pricing.discount_amount = 10.0;
        pricing.stop_rules_processing = true;
        let mut gift = PromotionRule::gift("R1", "FREE1", 1.0);
        gift.sort_order = 5;
        let mut rules = vec![pricing, gift];

        let report = evaluator.run_pass(&mut cart, &mut rules).unwrap();

        assert!(report.granted.is_empty());
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_without_handler_nothing_happens() {
        let catalog = catalog();
        let evaluator = RuleEvaluator::new();
        let mut cart = cart(&catalog, &[("A", 1)]);
        let mut rules = vec![PromotionRule::gift("R1", "FREE1", 1.0)];

        let report = evaluator.run_pass(&mut cart, &mut rules).unwrap();

        assert_eq!(report, PassReport::default());
        assert!(evaluator.handler_for(SimpleAction::AddGift).is_none());
    }

    #[test]
    fn test_lookup_failure_aborts_pass() {
        let catalog = catalog();
        let evaluator = RuleEvaluator::new().with_handler(GiftProvisioner::new(&catalog, &catalog));
        let mut cart = cart(&catalog, &[("A", 1)]);
        let mut rules = vec![PromotionRule::gift("R1", "GONE", 1.0)];

        let err = evaluator.run_pass(&mut cart, &mut rules).unwrap_err();

        assert!(err.is_product_lookup());
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_register_replaces_same_action() {
        let catalog = catalog();
        let mut evaluator = RuleEvaluator::new();
        evaluator.register(GiftProvisioner::new(&catalog, &catalog));
        evaluator.register(GiftProvisioner::new(&catalog, &catalog));

        assert_eq!(evaluator.handlers.len(), 1);
        assert!(evaluator.handler_for(SimpleAction::AddGift).is_some());
    }
}
