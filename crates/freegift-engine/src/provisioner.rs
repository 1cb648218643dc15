//! # Gift Provisioner
//!
//! Grants and retracts gift lines.
//!
//! ## One Evaluation Pass
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  reset(cart) ─────────► every is_gift line removed                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  rule engine matches (line, rule) pairs                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  handle_rule_match(cart, line, rule)                                    │
//! │       ├── rule.consumed?          ──► no-op                             │
//! │       ├── gift quantity < 1?      ──► no-op                             │
//! │       ├── build_gift_line(sku, store, qty)?   (ProductLookup on failure)│
//! │       └── cart.add_line(gift); rule.consumed = true                     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The gift line is only appended after it was built successfully, so a
//! lookup failure leaves the cart without a partial gift.

use freegift_core::{
    Cart, CartLine, CoreError, CoreResult, LineId, PromotionRule, SimpleAction, StoreId,
    ValidationError,
};
use tracing::{debug, info};

use crate::catalog::{Catalog, Inventory};
use crate::error::EngineResult;
use crate::handler::{ActionOutcome, RuleActionHandler};

/// Grants gift lines for "Add a Gift" rules.
pub struct GiftProvisioner<'a> {
    catalog: &'a dyn Catalog,
    inventory: &'a dyn Inventory,
}

impl<'a> GiftProvisioner<'a> {
    pub fn new(catalog: &'a dyn Catalog, inventory: &'a dyn Inventory) -> Self {
        GiftProvisioner { catalog, inventory }
    }

    /// Removes every gift line from the cart.
    ///
    /// Idempotent. Returns the number of lines removed.
    pub fn reset(cart: &mut Cart) -> usize {
        let removed = cart.remove_lines_where(|line| line.is_gift);

        if !removed.is_empty() {
            debug!(count = removed.len(), "Removed gift lines before evaluation");
        }

        removed.len()
    }

    /// Grants `rule`'s gift once per pass.
    ///
    /// Returns the id of the new gift line, or `None` when there was nothing
    /// to do. The caller guarantees `rule` is an "Add a Gift" rule and that
    /// the trigger line is not itself a gift.
    pub fn handle_rule_match(
        &self,
        cart: &mut Cart,
        trigger: LineId,
        rule: &mut PromotionRule,
    ) -> CoreResult<Option<LineId>> {
        if rule.consumed {
            debug!(rule_id = %rule.id, "Gift rule already applied this pass");
            return Ok(None);
        }

        let qty = rule.gift_quantity();
        if qty < 1 {
            debug!(rule_id = %rule.id, qty, "Gift quantity not positive, skipping");
            return Ok(None);
        }

        let store_id = cart
            .line(trigger)
            .map(|line| line.store_id.clone())
            .ok_or(CoreError::LineNotFound(trigger))?;

        let sku = rule.gift_sku.clone().unwrap_or_default();
        let mut gift = self.build_gift_line(&sku, store_id, qty)?;
        gift.applied_rule_id = Some(rule.id.clone());

        let line_id = cart.add_line(gift);
        rule.mark_consumed();

        info!(rule_id = %rule.id, sku = %sku, qty, line = %line_id, "Gift granted");
        Ok(Some(line_id))
    }

    /// Builds a zero-price gift line without attaching it to a cart.
    ///
    /// ## Errors
    /// - `ProductLookup` if `sku` is unknown or the product has no stock record
    /// - `Validation` if `qty` is not positive
    pub fn build_gift_line(&self, sku: &str, store_id: StoreId, qty: i64) -> CoreResult<CartLine> {
        if qty < 1 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        let mut product = self
            .catalog
            .get_by_sku(sku)
            .ok_or_else(|| CoreError::product_lookup(sku))?;
        self.inventory.assign_stock(&mut product)?;

        let mut line = CartLine::from_product(&product, store_id, qty);
        line.mark_as_gift();
        Ok(line)
    }
}

impl RuleActionHandler for GiftProvisioner<'_> {
    fn action(&self) -> SimpleAction {
        SimpleAction::AddGift
    }

    /// Gifts never trigger more gifts.
    fn accepts(&self, line: &CartLine) -> bool {
        !line.is_gift
    }

    fn before_pass(&self, cart: &mut Cart) -> EngineResult<()> {
        Self::reset(cart);
        Ok(())
    }

    fn apply(
        &self,
        cart: &mut Cart,
        trigger: LineId,
        rule: &mut PromotionRule,
    ) -> EngineResult<ActionOutcome> {
        Ok(match self.handle_rule_match(cart, trigger, rule)? {
            Some(line_id) => ActionOutcome::LineAdded(line_id),
            None => ActionOutcome::NoOp,
        })
    }
}
