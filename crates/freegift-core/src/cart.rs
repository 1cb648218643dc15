//! # Cart
//!
//! The cart (quote) being priced, and its lines.
//!
//! ## Line Aggregation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart::add_line                                       │
//! │                                                                         │
//! │  incoming line ──► same product AND same options as an existing line?  │
//! │                        │                                                │
//! │             yes ◄──────┴──────► no                                      │
//! │              │                   │                                      │
//! │   existing.qty += incoming.qty   insert under next LineId               │
//! │                                                                         │
//! │  Gift lines carry a fresh GiftToken in their options, so two gifts of  │
//! │  the same SKU never compare equal and always stay separate lines.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Line ids are handed out monotonically, so iterating the map yields lines
//! in insertion order.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::rule::RuleId;
use crate::types::{Product, StoreId};

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a line within one cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct LineId(u64);

impl LineId {
    #[inline]
    pub const fn new(id: u64) -> Self {
        LineId(id)
    }

    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-line uniqueness token that keeps gift lines from being aggregated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct GiftToken(String);

impl GiftToken {
    /// Generates a fresh, collision-resistant token (UUID v4).
    pub fn generate() -> Self {
        GiftToken(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// =============================================================================
// Buy Request
// =============================================================================

/// What the shopper asked for when the line was created.
///
/// Persisted with order lines so a reorder can rebuild the same line. For a
/// gift, `is_free_product` makes the reorder produce a free line again
/// instead of charging for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BuyRequest {
    pub qty: i64,
    #[serde(default)]
    pub is_free_product: bool,
}

impl BuyRequest {
    pub fn new(qty: i64) -> Self {
        BuyRequest {
            qty,
            is_free_product: false,
        }
    }

    /// A buy request for a gift of `qty` units.
    pub fn free(qty: i64) -> Self {
        BuyRequest {
            qty,
            is_free_product: true,
        }
    }

    /// Serialized form stored on order lines.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}

// =============================================================================
// Line Options
// =============================================================================

/// Typed option bag of a cart line.
///
/// Two lines of the same product are only merged when their custom options
/// and gift tokens are equal, which is what makes the gift token work.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineOptions {
    #[serde(default)]
    pub buy_request: Option<BuyRequest>,

    #[serde(default)]
    pub gift_token: Option<GiftToken>,

    /// Host-specific options (custom options, configurable attributes).
    #[serde(default)]
    pub custom: BTreeMap<String, String>,
}

// =============================================================================
// Cart Line
// =============================================================================

/// One product quantity in the cart.
///
/// Product data is frozen at the time the line is created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product_id: String,
    pub sku: String,
    pub name: String,
    pub store_id: StoreId,
    pub quantity: i64,

    /// Unit price in cents taken from the catalog.
    pub price_cents: i64,

    /// Override price; when set it replaces `price_cents` in totals.
    pub custom_price_cents: Option<i64>,

    /// Reference price for display/reporting. Never used in totals.
    pub original_custom_price_cents: Option<i64>,

    pub base_original_price_cents: i64,
    pub tax_rate_bps: u32,
    pub discount_cents: i64,
    pub discount_percent_bps: u32,
    pub base_discount_cents: i64,
    pub row_weight_grams: i64,

    /// Line was injected by a gift promotion.
    pub is_gift: bool,

    /// Rule that produced this line, if any.
    pub applied_rule_id: Option<RuleId>,

    #[serde(default)]
    pub options: LineOptions,

    #[ts(as = "String")]
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a regular (paid) line for `quantity` units of `product`.
    pub fn from_product(product: &Product, store_id: StoreId, quantity: i64) -> Self {
        CartLine {
            product_id: product.id.clone(),
            sku: product.sku.clone(),
            name: product.name.clone(),
            store_id,
            quantity,
            price_cents: product.price_cents,
            custom_price_cents: None,
            original_custom_price_cents: None,
            base_original_price_cents: product.price_cents,
            tax_rate_bps: product.tax_rate_bps,
            discount_cents: 0,
            discount_percent_bps: 0,
            base_discount_cents: 0,
            row_weight_grams: product.weight_grams.saturating_mul(quantity),
            is_gift: false,
            applied_rule_id: None,
            options: LineOptions {
                buy_request: Some(BuyRequest::new(quantity)),
                ..LineOptions::default()
            },
            added_at: Utc::now(),
        }
    }

    /// Turns this line into a free gift line.
    ///
    /// Zeroes every price, discount, tax and weight field that feeds totals,
    /// keeps the catalog price as the display-only reference, records a free
    /// buy request and attaches a uniqueness token if the line has none.
    pub fn mark_as_gift(&mut self) {
        let reference_price = self.original_custom_price_cents.unwrap_or(self.price_cents);

        self.price_cents = 0;
        self.custom_price_cents = Some(0);
        self.original_custom_price_cents = Some(reference_price);
        self.base_original_price_cents = 0;
        self.tax_rate_bps = 0;
        self.discount_cents = 0;
        self.discount_percent_bps = 0;
        self.base_discount_cents = 0;
        self.row_weight_grams = 0;
        self.is_gift = true;

        self.options.buy_request = Some(BuyRequest::free(self.quantity));
        if self.options.gift_token.is_none() {
            self.options.gift_token = Some(GiftToken::generate());
        }
    }

    /// Price used in totals: the override when set, else the catalog price.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.custom_price_cents.unwrap_or(self.price_cents))
    }

    /// Unit price × quantity.
    #[inline]
    pub fn row_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }

    /// Price to show the shopper ("was $15.00").
    pub fn reference_price(&self) -> Money {
        Money::from_cents(self.original_custom_price_cents.unwrap_or(self.price_cents))
    }

    /// Whether `other` describes the same purchasable as this line.
    ///
    /// The buy request is ignored: it only records the requested quantity.
    pub fn represents_same(&self, other: &CartLine) -> bool {
        self.product_id == other.product_id
            && self.is_gift == other.is_gift
            && self.options.gift_token == other.options.gift_token
            && self.options.custom == other.options.custom
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The in-progress order.
///
/// ## Invariants
/// - Every line is keyed by a unique, monotonically assigned `LineId`
/// - Lines of the same product with equal options are aggregated
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Cart {
    pub store_id: StoreId,

    lines: BTreeMap<LineId, CartLine>,

    next_line_id: u64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new(store_id: StoreId) -> Self {
        Cart {
            store_id,
            lines: BTreeMap::new(),
            next_line_id: 1,
            created_at: Utc::now(),
        }
    }

    /// Adds a line, merging it into an equivalent existing line.
    ///
    /// Returns the id of the line that now holds the quantity. Merged
    /// quantity and row weight saturate at `i64::MAX`.
    pub fn add_line(&mut self, line: CartLine) -> LineId {
        if let Some((id, existing)) = self
            .lines
            .iter_mut()
            .find(|(_, existing)| existing.represents_same(&line))
        {
            existing.quantity = existing.quantity.saturating_add(line.quantity);
            existing.row_weight_grams = existing.row_weight_grams.saturating_add(line.row_weight_grams);
            if let Some(request) = existing.options.buy_request.as_mut() {
                request.qty = existing.quantity;
            }
            return *id;
        }

        let id = LineId(self.next_line_id);
        self.next_line_id += 1;
        self.lines.insert(id, line);
        id
    }

    /// Removes a line by id.
    pub fn remove_line(&mut self, id: LineId) -> Option<CartLine> {
        self.lines.remove(&id)
    }

    /// Removes every line matching `predicate`, returning them in cart order.
    pub fn remove_lines_where<F>(&mut self, mut predicate: F) -> Vec<CartLine>
    where
        F: FnMut(&CartLine) -> bool,
    {
        let doomed: Vec<LineId> = self
            .lines
            .iter()
            .filter(|(_, line)| predicate(line))
            .map(|(id, _)| *id)
            .collect();

        doomed
            .into_iter()
            .filter_map(|id| self.lines.remove(&id))
            .collect()
    }

    pub fn line(&self, id: LineId) -> Option<&CartLine> {
        self.lines.get(&id)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> impl Iterator<Item = (LineId, &CartLine)> {
        self.lines.iter().map(|(id, line)| (*id, line))
    }

    /// Snapshot of the current line ids.
    pub fn line_ids(&self) -> Vec<LineId> {
        self.lines.keys().copied().collect()
    }

    /// Lines injected by gift promotions.
    pub fn gift_lines(&self) -> impl Iterator<Item = (LineId, &CartLine)> {
        self.lines().filter(|(_, line)| line.is_gift)
    }

    /// Number of distinct lines.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.lines
            .values()
            .fold(0i64, |total, line| total.saturating_add(line.quantity))
    }

    /// Sum of all row totals.
    pub fn subtotal(&self) -> Money {
        self.lines.values().map(CartLine::row_total).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Cart totals summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartTotals {
    pub line_count: usize,
    pub gift_line_count: usize,
    pub total_quantity: i64,
    pub subtotal_cents: i64,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        CartTotals {
            line_count: cart.line_count(),
            gift_line_count: cart.gift_lines().count(),
            total_quantity: cart.total_quantity(),
            subtotal_cents: cart.subtotal().cents(),
        }
    }
}
