//! Repository boundaries the engine depends on.
//!
//! Concrete implementations live in `forgeprice-infra`; the engine only sees
//! these traits.

use std::sync::Arc;

use forgeprice_core::{ItemId, PricingResult, RuleId};

use crate::item::PricingItem;
use crate::rule::{PricingRule, RuleRange};

/// Check run by a store against the current snapshot before a write commits.
pub type WriteCheck<'a, T> = &'a dyn Fn(&T, &[T]) -> PricingResult<()>;

/// Storage of pricing rules.
pub trait RuleStore: Send + Sync {
    /// All rules of `item`, in any order.
    fn rules_for_item(&self, item: ItemId) -> PricingResult<Vec<PricingRule>>;

    fn get(&self, id: RuleId) -> PricingResult<Option<PricingRule>>;

    /// Insert or replace `rule` after `check` accepts it.
    ///
    /// `check` receives the rules of the same item. Implementations must hold
    /// writes for that item until the rule is stored, so two concurrent saves
    /// can never both pass validation against a stale snapshot.
    fn save_checked(
        &self,
        rule: PricingRule,
        check: WriteCheck<'_, PricingRule>,
    ) -> PricingResult<PricingRule>;

    /// Rules of `item` whose range intersects `range`.
    fn rules_overlapping(&self, item: ItemId, range: &RuleRange) -> PricingResult<Vec<PricingRule>> {
        Ok(self
            .rules_for_item(item)?
            .into_iter()
            .filter(|rule| rule.range.overlaps(range))
            .collect())
    }
}

/// Storage of priced items.
pub trait ItemStore: Send + Sync {
    fn items(&self) -> PricingResult<Vec<PricingItem>>;

    fn get(&self, id: ItemId) -> PricingResult<Option<PricingItem>>;

    /// Insert or replace `item` after `check` accepts it against all items.
    fn save_checked(
        &self,
        item: PricingItem,
        check: WriteCheck<'_, PricingItem>,
    ) -> PricingResult<PricingItem>;
}

/// Raw catalog price list.
pub trait CatalogSource: Send + Sync {
    /// Full text of the price list. Fails with `DataSource` if it is absent.
    fn read_catalog(&self) -> PricingResult<String>;

    /// Where the text comes from, for logs.
    fn origin(&self) -> String;
}

impl<S: RuleStore + ?Sized> RuleStore for Arc<S> {
    fn rules_for_item(&self, item: ItemId) -> PricingResult<Vec<PricingRule>> {
        (**self).rules_for_item(item)
    }

    fn get(&self, id: RuleId) -> PricingResult<Option<PricingRule>> {
        (**self).get(id)
    }

    fn save_checked(
        &self,
        rule: PricingRule,
        check: WriteCheck<'_, PricingRule>,
    ) -> PricingResult<PricingRule> {
        (**self).save_checked(rule, check)
    }
}

impl<S: ItemStore + ?Sized> ItemStore for Arc<S> {
    fn items(&self) -> PricingResult<Vec<PricingItem>> {
        (**self).items()
    }

    fn get(&self, id: ItemId) -> PricingResult<Option<PricingItem>> {
        (**self).get(id)
    }

    fn save_checked(
        &self,
        item: PricingItem,
        check: WriteCheck<'_, PricingItem>,
    ) -> PricingResult<PricingItem> {
        (**self).save_checked(item, check)
    }
}

impl<S: CatalogSource + ?Sized> CatalogSource for Arc<S> {
    fn read_catalog(&self) -> PricingResult<String> {
        (**self).read_catalog()
    }

    fn origin(&self) -> String {
        (**self).origin()
    }
}
