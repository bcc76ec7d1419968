//! Pricing resolution engine.
//!
//! Two ways to price something:
//!
//! - **Rule path** ([`PricingEngine`]): width/height are matched against the
//!   item's non-overlapping rule ranges, priced as `area * rate + fixed`, and
//!   optionally post-processed by the rule's [`formula`] code.
//! - **Catalog path** ([`CatalogPricer`]): attribute filters select a row of a
//!   static price list; price is per unit or per square metre, plus tax.
//!
//! Storage is abstracted behind the traits in [`store`]; this crate does no IO
//! of its own apart from what a [`CatalogSource`] does.

pub mod calculator;
pub mod catalog;
pub mod definitions;
pub mod engine;
pub mod formula;
pub mod item;
pub mod overlap;
pub mod resolver;
pub mod rule;
pub mod store;

pub use calculator::{CatalogCalculation, RuleBase, catalog_price, rule_base};
pub use catalog::{
    CatalogCache, CatalogField, CatalogFilter, CatalogPricer, CatalogQuote, CatalogRequest,
    CatalogRow, CatalogSnapshot,
};
pub use definitions::{ItemRegistry, RuleDefinitions};
pub use engine::{PricingEngine, RuleQuote, RuleRequest, validate_dimensions};
pub use formula::{FormulaContext, FormulaEvaluator, FormulaOutcome};
pub use item::PricingItem;
pub use overlap::validate_rule;
pub use resolver::resolve_rule;
pub use rule::{PricingRule, RuleRange};
pub use store::{CatalogSource, ItemStore, RuleStore};
