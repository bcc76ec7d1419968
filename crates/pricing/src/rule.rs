//! Pricing rules: a per-item rate valid over a rectangular width/height range.

use serde::{Deserialize, Serialize};

use forgeprice_core::{Entity, ItemId, PricingError, PricingResult, RuleId, ValueObject};

/// Closed rectangular range `[min_width, max_width] x [min_height, max_height]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RuleRange {
    pub min_width: f64,
    pub max_width: f64,
    pub min_height: f64,
    pub max_height: f64,
}

impl ValueObject for RuleRange {}

impl RuleRange {
    pub fn new(min_width: f64, max_width: f64, min_height: f64, max_height: f64) -> Self {
        Self {
            min_width,
            max_width,
            min_height,
            max_height,
        }
    }

    /// Bounds must be strictly positive and ordered per axis.
    pub fn validate(&self) -> PricingResult<()> {
        let bounds = [self.min_width, self.max_width, self.min_height, self.max_height];
        if bounds.iter().any(|b| b.is_nan() || *b <= 0.0) {
            return Err(PricingError::validation(
                "Min/Max width and height must be greater than zero.",
            ));
        }
        if self.min_width > self.max_width {
            return Err(PricingError::validation("Min Width cannot exceed Max Width."));
        }
        if self.min_height > self.max_height {
            return Err(PricingError::validation("Min Height cannot exceed Max Height."));
        }
        Ok(())
    }

    /// Closed-interval intersection: ranges that only touch on an edge overlap.
    pub fn overlaps(&self, other: &RuleRange) -> bool {
        self.min_width <= other.max_width
            && self.max_width >= other.min_width
            && self.min_height <= other.max_height
            && self.max_height >= other.min_height
    }

    pub fn contains(&self, width: f64, height: f64) -> bool {
        self.min_width <= width
            && width <= self.max_width
            && self.min_height <= height
            && height <= self.max_height
    }
}

/// A pricing rule (pricing formula) for one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRule {
    pub id: RuleId,
    /// Display name, reported back as the formula name of a quote.
    pub name: String,
    pub item: ItemId,
    pub range: RuleRange,
    /// Rate per unit of area; unset means 0.
    pub price_per_area: Option<f64>,
    /// Flat amount added to the area price; unset means 0.
    pub fixed_cost: Option<f64>,
    /// Optional injected calculation, see [`crate::formula`].
    pub formula_code: Option<String>,
}

impl PricingRule {
    pub fn new(item: ItemId, name: impl Into<String>, range: RuleRange) -> Self {
        Self {
            id: RuleId::new(),
            name: name.into(),
            item,
            range,
            price_per_area: None,
            fixed_cost: None,
            formula_code: None,
        }
    }

    pub fn with_rate(mut self, price_per_area: f64) -> Self {
        self.price_per_area = Some(price_per_area);
        self
    }

    pub fn with_fixed_cost(mut self, fixed_cost: f64) -> Self {
        self.fixed_cost = Some(fixed_cost);
        self
    }

    pub fn with_formula(mut self, code: impl Into<String>) -> Self {
        self.formula_code = Some(code.into());
        self
    }

    pub fn rate(&self) -> f64 {
        self.price_per_area.unwrap_or(0.0)
    }

    pub fn fixed(&self) -> f64 {
        self.fixed_cost.unwrap_or(0.0)
    }

    /// Formula code with blank snippets treated as absent.
    pub fn formula(&self) -> Option<&str> {
        self.formula_code
            .as_deref()
            .filter(|code| !code.trim().is_empty())
    }
}

impl Entity for PricingRule {
    type Id = RuleId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> RuleRange {
        RuleRange::new(100.0, 500.0, 100.0, 500.0)
    }

    #[test]
    fn valid_range_passes() {
        assert!(range().validate().is_ok());
    }

    #[test]
    fn non_positive_bound_is_rejected() {
        let err = RuleRange::new(0.0, 500.0, 100.0, 500.0).validate().unwrap_err();
        assert_eq!(
            err,
            PricingError::validation("Min/Max width and height must be greater than zero.")
        );
        assert!(RuleRange::new(1.0, 5.0, 1.0, -5.0).validate().is_err());
        assert!(RuleRange::new(f64::NAN, 5.0, 1.0, 5.0).validate().is_err());
    }

    #[test]
    fn inverted_axes_are_rejected() {
        let err = RuleRange::new(600.0, 500.0, 100.0, 500.0).validate().unwrap_err();
        assert_eq!(err, PricingError::validation("Min Width cannot exceed Max Width."));

        let err = RuleRange::new(100.0, 500.0, 600.0, 500.0).validate().unwrap_err();
        assert_eq!(err, PricingError::validation("Min Height cannot exceed Max Height."));
    }

    #[test]
    fn touching_ranges_overlap() {
        let right = RuleRange::new(500.0, 900.0, 100.0, 500.0);
        assert!(range().overlaps(&right));
        assert!(right.overlaps(&range()));
    }

    #[test]
    fn disjoint_on_one_axis_does_not_overlap() {
        let above = RuleRange::new(100.0, 500.0, 501.0, 900.0);
        assert!(!range().overlaps(&above));
    }

    #[test]
    fn contains_is_inclusive() {
        assert!(range().contains(100.0, 500.0));
        assert!(range().contains(300.0, 200.0));
        assert!(!range().contains(99.9, 200.0));
        assert!(!range().contains(300.0, 500.1));
    }

    #[test]
    fn blank_formula_counts_as_absent() {
        let rule = PricingRule::new(ItemId::new(), "r", range()).with_formula("  \n ");
        assert_eq!(rule.formula(), None);
        assert_eq!(rule.rate(), 0.0);
        assert_eq!(rule.fixed(), 0.0);
    }
}
