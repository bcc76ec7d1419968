use std::collections::BTreeMap;
use std::sync::RwLock;

use forgeprice_core::{ItemId, PricingResult, RuleId};
use forgeprice_pricing::rule::PricingRule;
use forgeprice_pricing::store::{RuleStore, WriteCheck};

use super::poisoned;

/// Rules keyed by id.
///
/// Writes take the map's write lock for the whole check-then-insert, so saves
/// are serialized and every check sees the latest committed rules.
#[derive(Debug, Default)]
pub struct InMemoryRuleStore {
    rules: RwLock<BTreeMap<RuleId, PricingRule>>,
}

impl InMemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load rules without running any checks (imports, fixtures).
    pub fn with_unchecked(rules: impl IntoIterator<Item = PricingRule>) -> Self {
        Self {
            rules: RwLock::new(rules.into_iter().map(|r| (r.id, r)).collect()),
        }
    }

    pub fn len(&self) -> usize {
        self.rules.read().map(|rules| rules.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RuleStore for InMemoryRuleStore {
    fn rules_for_item(&self, item: ItemId) -> PricingResult<Vec<PricingRule>> {
        let rules = self.rules.read().map_err(|_| poisoned("rule"))?;
        Ok(rules.values().filter(|r| r.item == item).cloned().collect())
    }

    fn get(&self, id: RuleId) -> PricingResult<Option<PricingRule>> {
        let rules = self.rules.read().map_err(|_| poisoned("rule"))?;
        Ok(rules.get(&id).cloned())
    }

    fn save_checked(
        &self,
        rule: PricingRule,
        check: WriteCheck<'_, PricingRule>,
    ) -> PricingResult<PricingRule> {
        let mut rules = self.rules.write().map_err(|_| poisoned("rule"))?;

        let siblings: Vec<PricingRule> = rules
            .values()
            .filter(|other| other.item == rule.item)
            .cloned()
            .collect();
        check(&rule, siblings.as_slice())?;

        rules.insert(rule.id, rule.clone());
        Ok(rule)
    }
}
