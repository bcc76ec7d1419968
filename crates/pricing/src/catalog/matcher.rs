//! Catalog lookups: exact attribute matching and option listings.

use core::str::FromStr;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use forgeprice_core::PricingError;

use super::row::CatalogRow;

/// Optional attribute filters. Missing or empty values act as wildcards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogFilter {
    pub size: Option<String>,
    pub material: Option<String>,
    pub finish: Option<String>,
    pub sides: Option<String>,
    pub variables: Option<String>,
}

impl CatalogFilter {
    pub fn matches(&self, row: &CatalogRow) -> bool {
        fn accepts(filter: &Option<String>, value: &str) -> bool {
            match filter.as_deref() {
                None | Some("") => true,
                Some(wanted) => wanted == value,
            }
        }

        accepts(&self.sides, &row.printing_sides)
            && accepts(&self.variables, &row.variables)
            && accepts(&self.size, &row.size)
            && accepts(&self.material, &row.material)
            && accepts(&self.finish, &row.finish)
    }
}

/// First row (in load order) with the given group and category that passes
/// `filter`. `None` is a normal outcome; callers decide how to report it.
pub fn find_row<'a>(
    rows: &'a [CatalogRow],
    group: &str,
    category: &str,
    filter: &CatalogFilter,
) -> Option<&'a CatalogRow> {
    rows.iter().find(|row| {
        row.product_group == group && row.product_category == category && filter.matches(row)
    })
}

/// Catalog attributes that can be listed with [`distinct`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CatalogField {
    ProductGroup,
    ProductCategory,
    PrintingSides,
    Variables,
    Size,
    Material,
    Finish,
    Unit,
}

impl CatalogField {
    fn value<'a>(&self, row: &'a CatalogRow) -> &'a str {
        match self {
            Self::ProductGroup => &row.product_group,
            Self::ProductCategory => &row.product_category,
            Self::PrintingSides => &row.printing_sides,
            Self::Variables => &row.variables,
            Self::Size => &row.size,
            Self::Material => &row.material,
            Self::Finish => &row.finish,
            Self::Unit => &row.unit,
        }
    }
}

impl FromStr for CatalogField {
    type Err = PricingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "productGroup" => Ok(Self::ProductGroup),
            "productCategory" => Ok(Self::ProductCategory),
            "printingSides" => Ok(Self::PrintingSides),
            "variables" => Ok(Self::Variables),
            "size" => Ok(Self::Size),
            "material" => Ok(Self::Material),
            "finish" => Ok(Self::Finish),
            "unit" => Ok(Self::Unit),
            other => Err(PricingError::validation(format!(
                "unknown catalog field: {other}"
            ))),
        }
    }
}

/// Sorted, de-duplicated, trimmed non-empty values of `field`.
pub fn distinct<'a>(field: CatalogField, rows: impl IntoIterator<Item = &'a CatalogRow>) -> Vec<String> {
    rows.into_iter()
        .map(|row| field.value(row).trim())
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
