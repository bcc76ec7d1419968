//! Catalog rows: reference-priced product configurations.

use serde::{Deserialize, Serialize};

use forgeprice_core::CatalogRowId;

/// Unit value that switches a row to area pricing.
pub const AREA_UNIT: &str = "sq/m";

/// One priced configuration from the catalog price list.
///
/// Immutable once loaded. The cost columns (`ink_cost` .. `or_cost`) are carried
/// for reference only and never enter a computed price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRow {
    pub id: CatalogRowId,
    pub product_group: String,
    pub product_category: String,
    pub printing_sides: String,
    pub variables: String,
    pub size: String,
    pub material: String,
    pub finish: String,
    /// Fraction in `0..=1`.
    pub tax_rate: f64,
    pub unit_price: f64,
    pub unit: String,
    pub ink_cost: f64,
    pub sheet_cost: f64,
    pub lamination_cost: f64,
    pub or_cost: f64,
}

impl CatalogRow {
    pub fn is_area_priced(&self) -> bool {
        self.unit.eq_ignore_ascii_case(AREA_UNIT)
    }

    /// Short human description, e.g. `Banner - 1000x500 PVC`.
    pub fn description(&self) -> String {
        format!("{} - {} {}", self.product_category, self.size, self.material)
    }
}
