//! Definition-time validation of rule ranges.

use tracing::warn;

use forgeprice_core::{Entity, PricingError, PricingResult};

use crate::rule::PricingRule;

pub const OVERLAP_MESSAGE: &str = "An overlapping formula range already exists for this item.";

/// Validate `candidate` against the persisted rules of its item.
///
/// `existing` may contain rules of other items and the candidate's own
/// previous revision; both are ignored.
pub fn validate_rule(candidate: &PricingRule, existing: &[PricingRule]) -> PricingResult<()> {
    candidate.range.validate()?;

    let conflict = existing
        .iter()
        .filter(|other| other.item == candidate.item)
        .filter(|other| !other.is_same_record(candidate))
        .find(|other| candidate.range.overlaps(&other.range));

    if let Some(other) = conflict {
        warn!(
            item = %candidate.item,
            rule = %candidate.id,
            conflicting_rule = %other.id,
            "rejected overlapping rule range"
        );
        return Err(PricingError::conflict(OVERLAP_MESSAGE));
    }

    Ok(())
}
