//! Write side: saving rules and items with their definition checks.

use tracing::info;

use forgeprice_core::{PricingError, PricingResult};

use crate::formula::FormulaEvaluator;
use crate::item::{PricingItem, validate_item};
use crate::overlap::validate_rule;
use crate::rule::PricingRule;
use crate::store::{ItemStore, RuleStore};

/// Creates and updates pricing rules.
pub struct RuleDefinitions<R> {
    store: R,
    formulas: FormulaEvaluator,
}

impl<R: RuleStore> RuleDefinitions<R> {
    pub fn new(store: R) -> Self {
        Self {
            store,
            formulas: FormulaEvaluator::default(),
        }
    }

    /// Validate and persist `rule` (insert, or update when its id exists).
    ///
    /// Nothing is written when any check fails.
    pub fn save(&self, rule: PricingRule) -> PricingResult<PricingRule> {
        if let Some(code) = rule.formula() {
            self.formulas.compile(code).map_err(|err| {
                PricingError::validation(format!("Formula code is invalid: {err}"))
            })?;
        }

        let saved = self.store.save_checked(rule, &validate_rule)?;
        info!(item = %saved.item, rule = %saved.id, "pricing rule saved");
        Ok(saved)
    }
}

/// Creates and updates priced items.
pub struct ItemRegistry<I> {
    store: I,
}

impl<I: ItemStore> ItemRegistry<I> {
    pub fn new(store: I) -> Self {
        Self { store }
    }

    pub fn save(&self, item: PricingItem) -> PricingResult<PricingItem> {
        let saved = self.store.save_checked(item, &validate_item)?;
        info!(item = %saved.id, name = %saved.item_name, "pricing item saved");
        Ok(saved)
    }
}
