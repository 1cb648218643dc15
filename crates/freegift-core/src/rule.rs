//! # Promotion Rules
//!
//! Condition → action pairings evaluated against cart lines.
//!
//! Only the "Add a Gift" action is executed by this workspace; the other
//! actions exist so rules can be loaded and routed, and are priced by the
//! host.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cart::CartLine;
use crate::error::ValidationError;

// =============================================================================
// Rule Id
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct RuleId(String);

impl RuleId {
    pub fn new(id: impl Into<String>) -> Self {
        RuleId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for RuleId {
    fn from(id: &str) -> Self {
        RuleId(id.to_string())
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Simple Action
// =============================================================================

/// What a rule does once its conditions match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SimpleAction {
    /// Percent of product price discount.
    ByPercent,
    /// Fixed amount discount per item.
    ByFixed,
    /// Fixed amount discount for the whole cart.
    CartFixed,
    /// Buy X get Y free.
    BuyXGetY,
    /// Add a free gift line; `discount_amount` is the gift quantity.
    AddGift,
}

impl SimpleAction {
    /// Every action, in admin drop-down order.
    pub const ALL: [SimpleAction; 5] = [
        SimpleAction::ByPercent,
        SimpleAction::ByFixed,
        SimpleAction::CartFixed,
        SimpleAction::BuyXGetY,
        SimpleAction::AddGift,
    ];

    /// Wire value, as submitted by the admin form.
    pub fn as_str(&self) -> &'static str {
        match self {
            SimpleAction::ByPercent => "by_percent",
            SimpleAction::ByFixed => "by_fixed",
            SimpleAction::CartFixed => "cart_fixed",
            SimpleAction::BuyXGetY => "buy_x_get_y",
            SimpleAction::AddGift => "add_gift",
        }
    }

    /// Human-readable label for the admin drop-down.
    pub fn label(&self) -> &'static str {
        match self {
            SimpleAction::ByPercent => "Percent of product price discount",
            SimpleAction::ByFixed => "Fixed amount discount",
            SimpleAction::CartFixed => "Fixed amount discount for whole cart",
            SimpleAction::BuyXGetY => "Buy X get Y free (discount amount is Y)",
            SimpleAction::AddGift => "Add a Gift",
        }
    }
}

impl fmt::Display for SimpleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimpleAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SimpleAction::ALL
            .into_iter()
            .find(|action| action.as_str() == s.trim())
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "simple_action".to_string(),
                reason: format!("unknown action '{}'", s),
            })
    }
}

// =============================================================================
// Item Condition
// =============================================================================

/// A predicate over one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ItemCondition {
    /// Line SKU equals the value.
    Sku(String),
    /// Line SKU is one of the values.
    SkuIn(Vec<String>),
    /// Line quantity is at least the value.
    MinQuantity(i64),
    /// Line row total is at least the value (cents).
    MinRowTotalCents(i64),
}

impl ItemCondition {
    pub fn matches(&self, line: &CartLine) -> bool {
        match self {
            ItemCondition::Sku(sku) => line.sku == *sku,
            ItemCondition::SkuIn(skus) => skus.iter().any(|sku| *sku == line.sku),
            ItemCondition::MinQuantity(min) => line.quantity >= *min,
            ItemCondition::MinRowTotalCents(min) => line.row_total().cents() >= *min,
        }
    }
}

// =============================================================================
// Promotion Rule
// =============================================================================

/// A cart promotion rule.
///
/// `consumed` is transient evaluation state: the rule evaluator clears it at
/// the start of every pass and the gift action sets it once a gift has been
/// granted, so a rule grants at most one gift per pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PromotionRule {
    pub id: RuleId,

    pub name: String,

    #[serde(default = "default_true")]
    pub is_active: bool,

    /// Lower values are evaluated first.
    #[serde(default)]
    pub sort_order: i32,

    pub action: SimpleAction,

    /// Discount value; for `AddGift` the gift quantity (truncated).
    #[serde(default)]
    pub discount_amount: f64,

    #[serde(default)]
    pub gift_sku: Option<String>,

    /// All conditions must hold for a line to match. Empty matches every line.
    #[serde(default)]
    pub conditions: Vec<ItemCondition>,

    /// Skip the remaining rules for a line once this one applied to it.
    #[serde(default)]
    pub stop_rules_processing: bool,

    #[serde(skip)]
    #[ts(skip)]
    pub consumed: bool,
}

fn default_true() -> bool {
    true
}

impl PromotionRule {
    pub fn new(id: impl Into<String>, name: impl Into<String>, action: SimpleAction) -> Self {
        PromotionRule {
            id: RuleId::new(id),
            name: name.into(),
            is_active: true,
            sort_order: 0,
            action,
            discount_amount: 0.0,
            gift_sku: None,
            conditions: Vec::new(),
            stop_rules_processing: false,
            consumed: false,
        }
    }

    /// An "Add a Gift" rule granting `quantity` units of `gift_sku`.
    pub fn gift(id: impl Into<String>, gift_sku: impl Into<String>, quantity: f64) -> Self {
        let id = id.into();
        let mut rule = PromotionRule::new(id.clone(), id, SimpleAction::AddGift);
        rule.gift_sku = Some(gift_sku.into());
        rule.discount_amount = quantity;
        rule
    }

    /// Adds a condition (builder style).
    pub fn with_condition(mut self, condition: ItemCondition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Gift quantity: `discount_amount` truncated toward zero.
    ///
    /// NaN and out-of-range values saturate (NaN becomes 0).
    pub fn gift_quantity(&self) -> i64 {
        self.discount_amount.trunc() as i64
    }

    /// Whether every condition holds for `line`.
    pub fn matches(&self, line: &CartLine) -> bool {
        self.conditions.iter().all(|condition| condition.matches(line))
    }

    pub fn mark_consumed(&mut self) {
        self.consumed = true;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
