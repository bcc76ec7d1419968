//! Price arithmetic shared by the rule path and the catalog path.

use serde::{Deserialize, Serialize};

use forgeprice_core::{PricingError, PricingResult, ValueObject};

use crate::catalog::CatalogRow;
use crate::rule::PricingRule;

pub const DIMENSIONS_REQUIRED_MESSAGE: &str = "Height and Width are required for this item.";

/// Area price of a rule before any formula code runs.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleBase {
    pub area: f64,
    pub base_price: f64,
    /// Explanation shown to end users, in order.
    pub lines: Vec<String>,
}

impl ValueObject for RuleBase {}

/// `area = width * height`, `base = area * rate + fixed`.
pub fn rule_base(rule: &PricingRule, item_label: &str, width: f64, height: f64) -> RuleBase {
    let area = width * height;
    let base_price = area * rule.rate() + rule.fixed();

    let lines = vec![
        format!("Item: {item_label}"),
        format!("Width x Height: {width} x {height}"),
        format!("Area: {area}"),
        format!("Price per area: {}", rule.rate()),
        format!("Fixed cost: {}", rule.fixed()),
    ];

    RuleBase {
        area,
        base_price,
        lines,
    }
}

/// Result of pricing one catalog row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogCalculation {
    pub base_price: f64,
    /// Net total: `base_price * quantity`.
    pub total: f64,
    pub vat_amount: f64,
    pub total_with_vat: f64,
    /// Only present for area-priced rows.
    pub area_m2: Option<f64>,
}

impl ValueObject for CatalogCalculation {}

/// Price `quantity` units of `row`.
///
/// Area-priced rows (`sq/m`) need positive `height_mm` and `width_mm`; other
/// rows ignore the dimensions. A missing quantity counts as 0.
pub fn catalog_price(
    row: &CatalogRow,
    quantity: Option<f64>,
    height_mm: Option<f64>,
    width_mm: Option<f64>,
) -> PricingResult<CatalogCalculation> {
    let quantity = quantity.unwrap_or(0.0);
    if quantity.is_nan() || quantity < 0.0 {
        return Err(PricingError::validation("Quantity cannot be negative."));
    }

    let (base_price, area_m2) = if row.is_area_priced() {
        let (height, width) = match (positive(height_mm), positive(width_mm)) {
            (Some(h), Some(w)) => (h, w),
            _ => return Err(PricingError::validation(DIMENSIONS_REQUIRED_MESSAGE)),
        };
        let area = (height / 1000.0) * (width / 1000.0);
        (area * row.unit_price, Some(area))
    } else {
        (row.unit_price, None)
    };

    let total = base_price * quantity;
    let vat_amount = total * row.tax_rate;

    Ok(CatalogCalculation {
        base_price,
        total,
        vat_amount,
        total_with_vat: total + vat_amount,
        area_m2,
    })
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleRange;
    use forgeprice_core::{CatalogRowId, ItemId};

    fn catalog_row(unit: &str, unit_price: f64, tax_rate: f64) -> CatalogRow {
        CatalogRow {
            id: CatalogRowId::from_position(1),
            product_group: "Signs".into(),
            product_category: "Banner".into(),
            printing_sides: String::new(),
            variables: String::new(),
            size: String::new(),
            material: String::new(),
            finish: String::new(),
            tax_rate,
            unit_price,
            unit: unit.into(),
            ink_cost: 3.0,
            sheet_cost: 4.0,
            lamination_cost: 5.0,
            or_cost: 6.0,
        }
    }

    #[test]
    fn rule_base_matches_worked_example() {
        let rule = PricingRule::new(ItemId::new(), "r", RuleRange::new(100.0, 500.0, 100.0, 500.0))
            .with_rate(0.002)
            .with_fixed_cost(5.0);
        let base = rule_base(&rule, "Banner", 300.0, 200.0);
        assert_eq!(base.area, 60000.0);
        assert_eq!(base.base_price, 125.0);
        assert_eq!(
            base.lines,
            vec![
                "Item: Banner",
                "Width x Height: 300 x 200",
                "Area: 60000",
                "Price per area: 0.002",
                "Fixed cost: 5",
            ]
        );
    }

    #[test]
    fn unset_rate_and_fixed_cost_are_zero() {
        let rule = PricingRule::new(ItemId::new(), "r", RuleRange::new(1.0, 10.0, 1.0, 10.0));
        assert_eq!(rule_base(&rule, "x", 2.0, 3.0).base_price, 0.0);
    }

    #[test]
    fn area_priced_row_matches_worked_example() {
        let row = catalog_row("sq/m", 10.0, 0.2);
        let calc = catalog_price(&row, Some(2.0), Some(1000.0), Some(500.0)).unwrap();
        assert_eq!(calc.area_m2, Some(0.5));
        assert_eq!(calc.base_price, 5.0);
        assert_eq!(calc.total, 10.0);
        assert_eq!(calc.vat_amount, 2.0);
        assert_eq!(calc.total_with_vat, 12.0);
    }

    #[test]
    fn area_unit_is_case_insensitive() {
        let row = catalog_row("SQ/M", 10.0, 0.0);
        let calc = catalog_price(&row, Some(1.0), Some(2000.0), Some(1000.0)).unwrap();
        assert_eq!(calc.area_m2, Some(2.0));
    }

    #[test]
    fn area_priced_row_requires_both_dimensions() {
        let row = catalog_row("sq/m", 10.0, 0.2);
        for (h, w) in [
            (None, Some(500.0)),
            (Some(1000.0), None),
            (Some(0.0), Some(500.0)),
            (Some(f64::INFINITY), Some(500.0)),
            (Some(1000.0), Some(f64::NAN)),
        ] {
            let err = catalog_price(&row, Some(1.0), h, w).unwrap_err();
            assert_eq!(err, PricingError::validation(DIMENSIONS_REQUIRED_MESSAGE));
        }
    }

    #[test]
    fn unit_priced_row_ignores_dimensions_and_costs() {
        let row = catalog_row("each", 7.5, 0.2);
        let calc = catalog_price(&row, Some(4.0), Some(10.0), None).unwrap();
        assert_eq!(calc.base_price, 7.5);
        assert_eq!(calc.total, 30.0);
        assert_eq!(calc.area_m2, None);
    }

    #[test]
    fn missing_quantity_prices_to_zero() {
        let row = catalog_row("each", 7.5, 0.2);
        let calc = catalog_price(&row, None, None, None).unwrap();
        assert_eq!(calc.total, 0.0);
        assert_eq!(calc.total_with_vat, 0.0);
    }

    #[test]
    fn negative_quantity_is_rejected() {
        let row = catalog_row("each", 7.5, 0.2);
        assert!(catalog_price(&row, Some(-1.0), None, None).is_err());
    }

    #[test]
    fn absent_area_serializes_as_null() {
        let row = catalog_row("each", 1.0, 0.0);
        let calc = catalog_price(&row, Some(1.0), None, None).unwrap();
        let json = serde_json::to_value(&calc).unwrap();
        assert!(json["areaM2"].is_null());
        assert_eq!(json["totalWithVat"], 1.0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn gross_is_net_plus_vat(
                price in 0.0f64..10_000.0,
                tax in 0.0f64..1.0,
                quantity in 0.0f64..1_000.0,
            ) {
                let row = catalog_row("each", price, tax);
                let calc = catalog_price(&row, Some(quantity), None, None).unwrap();
                prop_assert_eq!(calc.total_with_vat, calc.total + calc.total * tax);
                prop_assert_eq!(calc.base_price, price);
                prop_assert!(calc.area_m2.is_none());
            }

            #[test]
            fn rule_area_is_width_times_height(
                width in 1.0f64..5_000.0,
                height in 1.0f64..5_000.0,
                rate in 0.0f64..1.0,
                fixed in 0.0f64..100.0,
            ) {
                let rule = PricingRule::new(ItemId::new(), "r", RuleRange::new(1.0, 5_000.0, 1.0, 5_000.0))
                    .with_rate(rate)
                    .with_fixed_cost(fixed);
                let base = rule_base(&rule, "x", width, height);
                prop_assert_eq!(base.area, width * height);
                prop_assert_eq!(base.base_price, base.area * rate + fixed);
            }
        }
    }
}
