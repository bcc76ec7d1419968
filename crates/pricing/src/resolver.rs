//! Range resolution: which rule prices a given width/height for an item.

use tracing::{debug, warn};

use forgeprice_core::{ItemId, PricingError, PricingResult};

use crate::rule::PricingRule;

pub const NO_RULE_MESSAGE: &str = "No pricing formula found for these dimensions.";

/// Select the rule of `item` whose range contains `(width, height)`.
///
/// Overlaps are rejected at definition time, so at most one rule should match.
/// If stored data violates that (e.g. an import that skipped validation), the
/// match with the lowest [`forgeprice_core::RuleId`] wins, which for UUIDv7 ids
/// is the oldest rule.
pub fn resolve_rule<'a>(
    rules: &'a [PricingRule],
    item: ItemId,
    width: f64,
    height: f64,
) -> PricingResult<&'a PricingRule> {
    let mut matches: Vec<&PricingRule> = rules
        .iter()
        .filter(|rule| rule.item == item && rule.range.contains(width, height))
        .collect();
    matches.sort_by_key(|rule| rule.id);

    if matches.len() > 1 {
        warn!(
            item = %item,
            matches = matches.len(),
            "overlapping rules matched; using the oldest"
        );
    }

    match matches.first() {
        Some(rule) => {
            debug!(item = %item, width, height, rule = %rule.id, "resolved pricing rule");
            Ok(rule)
        }
        None => Err(PricingError::not_found(NO_RULE_MESSAGE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleRange;
    use forgeprice_core::RuleId;

    fn rule(item: ItemId, range: RuleRange) -> PricingRule {
        PricingRule::new(item, "rule", range)
    }

    #[test]
    fn picks_the_containing_range() {
        let item = ItemId::new();
        let small = rule(item, RuleRange::new(1.0, 99.0, 1.0, 99.0));
        let large = rule(item, RuleRange::new(100.0, 500.0, 100.0, 500.0));
        let rules = vec![small, large.clone()];
        let found = resolve_rule(&rules, item, 300.0, 200.0).unwrap();
        assert_eq!(found.id, large.id);
    }

    #[test]
    fn no_match_is_not_found() {
        let item = ItemId::new();
        let rules = vec![rule(item, RuleRange::new(100.0, 500.0, 100.0, 500.0))];
        let err = resolve_rule(&rules, item, 600.0, 200.0).unwrap_err();
        assert_eq!(err, PricingError::not_found(NO_RULE_MESSAGE));
    }

    #[test]
    fn rules_of_other_items_never_match() {
        let rules = vec![rule(ItemId::new(), RuleRange::new(1.0, 500.0, 1.0, 500.0))];
        assert!(resolve_rule(&rules, ItemId::new(), 10.0, 10.0).is_err());
    }

    #[test]
    fn overlapping_data_resolves_to_lowest_id() {
        let item = ItemId::new();
        let range = RuleRange::new(1.0, 500.0, 1.0, 500.0);
        let mut older = rule(item, range);
        let mut newer = rule(item, range);
        older.id = RuleId::from_uuid("00000000-0000-7000-8000-000000000001".parse().unwrap());
        newer.id = RuleId::from_uuid("00000000-0000-7000-8000-000000000002".parse().unwrap());
        let rules = vec![newer, older.clone()];
        let found = resolve_rule(&rules, item, 10.0, 10.0).unwrap();
        assert_eq!(found.id, older.id);
    }
}
