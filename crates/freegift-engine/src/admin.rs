//! # Admin Save Validation
//!
//! Checks a submitted promotion-rule form before it is persisted. A rejected
//! save hands the submitted form back so the admin page can re-display the
//! unsaved input next to the message.

use freegift_core::validation::validate_gift_quantity;
use freegift_core::{ItemCondition, PromotionRule, RuleId, SimpleAction, ValidationError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::catalog::Catalog;
use crate::config::GiftSettings;

/// The promotion-rule form as submitted by the admin UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleForm {
    pub name: String,

    #[serde(default = "default_true")]
    pub is_active: bool,

    #[serde(default)]
    pub sort_order: i32,

    pub simple_action: SimpleAction,

    #[serde(default)]
    pub discount_amount: f64,

    /// Free-text "Free product SKU" field.
    #[serde(default)]
    pub gift_sku: Option<String>,

    #[serde(default)]
    pub conditions: Vec<ItemCondition>,

    #[serde(default)]
    pub stop_rules_processing: bool,
}

fn default_true() -> bool {
    true
}

impl RuleForm {
    /// Builds the rule to persist. Call after [`validate_rule_save`].
    pub fn into_rule(self, id: RuleId) -> PromotionRule {
        let gift_sku = self
            .gift_sku
            .map(|sku| sku.trim().to_string())
            .filter(|sku| !sku.is_empty());

        PromotionRule {
            id,
            name: self.name,
            is_active: self.is_active,
            sort_order: self.sort_order,
            action: self.simple_action,
            discount_amount: self.discount_amount,
            gift_sku,
            conditions: self.conditions,
            stop_rules_processing: self.stop_rules_processing,
            consumed: false,
        }
    }
}

/// A rejected rule save.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{reason}")]
pub struct RuleSaveError {
    pub reason: ValidationError,
    /// The submitted form, for re-display.
    pub page_data: RuleForm,
}

/// Validates a rule form before save.
///
/// Only "Add a Gift" rules are checked: the gift SKU must name an existing
/// product and the gift quantity must not exceed the configured ceiling.
pub fn validate_rule_save(
    form: RuleForm,
    catalog: &dyn Catalog,
    settings: &GiftSettings,
) -> Result<RuleForm, RuleSaveError> {
    if form.simple_action != SimpleAction::AddGift {
        return Ok(form);
    }

    let sku = form.gift_sku.as_deref().map(str::trim).unwrap_or_default();
    let reason = if sku.is_empty() || catalog.id_by_sku(sku).is_none() {
        Some(ValidationError::UnknownGiftSku {
            sku: sku.to_string(),
        })
    } else {
        let qty = form.discount_amount.trunc() as i64;
        validate_gift_quantity(qty, settings.max_quantity).err()
    };

    match reason {
        Some(reason) => {
            warn!(sku = %sku, error = %reason, "Rejected gift rule save");
            Err(RuleSaveError {
                reason,
                page_data: form,
            })
        }
        None => Ok(form),
    }
}
