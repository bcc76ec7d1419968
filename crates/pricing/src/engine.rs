//! Rule path: dimensions -> matching rule -> base price -> optional formula.

use serde::{Deserialize, Serialize};
use tracing::info;

use forgeprice_core::{ItemId, PricingError, PricingResult, RuleId};

use crate::calculator::rule_base;
use crate::formula::{FormulaContext, FormulaEvaluator};
use crate::resolver::resolve_rule;
use crate::store::{ItemStore, RuleStore};

/// Priced width/height request for one item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleRequest {
    pub item: ItemId,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleQuote {
    pub price: f64,
    /// `breakdown_lines` joined with newlines.
    pub breakdown: String,
    pub breakdown_lines: Vec<String>,
    pub area: f64,
    pub formula_name: String,
    pub rule_id: RuleId,
}

/// Both dimensions must be finite and strictly positive.
pub fn validate_dimensions(width: f64, height: f64) -> PricingResult<()> {
    ensure_positive(width, "Width")?;
    ensure_positive(height, "Height")
}

fn ensure_positive(value: f64, label: &str) -> PricingResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(PricingError::validation(format!(
            "{label} must be greater than zero."
        )));
    }
    Ok(())
}

pub struct PricingEngine<R, I> {
    rules: R,
    items: I,
    formulas: FormulaEvaluator,
}

impl<R: RuleStore, I: ItemStore> PricingEngine<R, I> {
    pub fn new(rules: R, items: I) -> Self {
        Self::with_evaluator(rules, items, FormulaEvaluator::default())
    }

    pub fn with_evaluator(rules: R, items: I, formulas: FormulaEvaluator) -> Self {
        Self {
            rules,
            items,
            formulas,
        }
    }

    pub fn calculate(&self, request: &RuleRequest) -> PricingResult<RuleQuote> {
        let RuleRequest {
            item,
            width,
            height,
        } = *request;
        validate_dimensions(width, height)?;

        let item_name = self
            .items
            .get(item)?
            .map(|found| found.item_name)
            .ok_or_else(|| PricingError::not_found("Pricing item not found."))?;

        let rules = self.rules.rules_for_item(item)?;
        let rule = resolve_rule(&rules, item, width, height)?;

        let base = rule_base(rule, &item_name, width, height);
        let mut lines = base.lines;
        let mut price = base.base_price;

        if let Some(code) = rule.formula() {
            let context = FormulaContext {
                width,
                height,
                area: base.area,
                base_total: base.base_price,
            };
            let outcome = self.formulas.evaluate(&rule.name, code, &context)?;
            price = outcome.total;
            lines.extend(outcome.breakdown_lines);
        }

        lines.push(format!("Total: {price}"));

        info!(item = %item, rule = %rule.id, width, height, price, "rule price calculated");

        Ok(RuleQuote {
            price,
            breakdown: lines.join("\n"),
            breakdown_lines: lines,
            area: base.area,
            formula_name: rule.name.clone(),
            rule_id: rule.id,
        })
    }
}
