//! # Rule Action Handlers
//!
//! One handler per [`SimpleAction`]. The evaluator calls them directly:
//!
//! ```text
//! run_pass(cart, rules)
//!   │
//!   ├── handler.before_pass(cart)            every handler, once
//!   │
//!   └── for each (line, rule) that matches
//!         └── handler_for(rule.action)
//!               ├── accepts(line)?  no ──► skip
//!               └── apply(cart, line_id, rule)
//! ```

use freegift_core::{Cart, CartLine, LineId, PromotionRule, SimpleAction};

use crate::error::EngineResult;

/// What a handler did for one (line, rule) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing to do (already consumed, zero quantity, ...).
    NoOp,
    /// A new line was added to the cart.
    LineAdded(LineId),
}

/// Executes one kind of rule action.
pub trait RuleActionHandler {
    /// The action this handler executes.
    fn action(&self) -> SimpleAction;

    /// Whether `line` may trigger this action at all.
    fn accepts(&self, _line: &CartLine) -> bool {
        true
    }

    /// Runs at the start of every pass, before any rule is evaluated.
    fn before_pass(&self, _cart: &mut Cart) -> EngineResult<()> {
        Ok(())
    }

    /// Applies `rule` for the matched line `trigger`.
    fn apply(
        &self,
        cart: &mut Cart,
        trigger: LineId,
        rule: &mut PromotionRule,
    ) -> EngineResult<ActionOutcome>;
}
