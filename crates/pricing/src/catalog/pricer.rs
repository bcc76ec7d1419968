//! Catalog quotes: lookup + arithmetic, shaped for callers.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use forgeprice_core::{CatalogRowId, PricingError, PricingResult};

use super::cache::{CatalogCache, CatalogSnapshot};
use super::matcher::{CatalogField, CatalogFilter, distinct, find_row};
use super::row::CatalogRow;
use crate::calculator::{CatalogCalculation, catalog_price};
use crate::store::CatalogSource;

pub const NO_PRODUCT_MESSAGE: &str = "Product configuration not found.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Dimensions {
    pub height_mm: Option<f64>,
    pub width_mm: Option<f64>,
}

/// A catalog-path pricing request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogRequest {
    pub product_group: String,
    pub product_category: String,
    pub options: CatalogFilter,
    pub quantity: Option<f64>,
    pub dimensions: Dimensions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteBreakdown {
    pub unit: String,
    pub area_m2: Option<f64>,
    pub rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteMeta {
    pub product_id: CatalogRowId,
    pub description: String,
}

/// Priced catalog configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuote {
    /// Price of one unit (area-adjusted for `sq/m` rows).
    pub unit_price: f64,
    pub net_total: f64,
    pub vat_total: f64,
    pub gross_total: f64,
    pub currency: String,
    pub breakdown: QuoteBreakdown,
    pub meta: QuoteMeta,
    pub row: CatalogRow,
    pub calc: CatalogCalculation,
}

/// Catalog-path façade over a shared [`CatalogCache`].
#[derive(Debug)]
pub struct CatalogPricer<S> {
    cache: Arc<CatalogCache<S>>,
    currency: String,
}

impl<S: CatalogSource> CatalogPricer<S> {
    pub fn new(cache: Arc<CatalogCache<S>>, currency: impl Into<String>) -> Self {
        Self {
            cache,
            currency: currency.into(),
        }
    }

    /// The whole parsed catalog.
    pub fn dataset(&self) -> PricingResult<Arc<CatalogSnapshot>> {
        self.cache.get()
    }

    /// Selectable values for one attribute.
    pub fn options(&self, field: CatalogField) -> PricingResult<Vec<String>> {
        Ok(distinct(field, &self.cache.get()?.rows))
    }

    pub fn quote(&self, request: &CatalogRequest) -> PricingResult<CatalogQuote> {
        if request.quantity.is_some_and(|q| q.is_nan() || q < 0.0) {
            return Err(PricingError::validation("Quantity cannot be negative."));
        }

        let snapshot = self.cache.get()?;
        let row = find_row(
            &snapshot.rows,
            &request.product_group,
            &request.product_category,
            &request.options,
        )
        .ok_or_else(|| {
            debug!(
                group = %request.product_group,
                category = %request.product_category,
                "no catalog row matched"
            );
            PricingError::not_found(NO_PRODUCT_MESSAGE)
        })?;

        let calc = catalog_price(
            row,
            request.quantity,
            request.dimensions.height_mm,
            request.dimensions.width_mm,
        )?;

        info!(
            product = %row.id,
            net = calc.total,
            gross = calc.total_with_vat,
            "catalog price calculated"
        );

        Ok(CatalogQuote {
            unit_price: calc.base_price,
            net_total: calc.total,
            vat_total: calc.vat_amount,
            gross_total: calc.total_with_vat,
            currency: self.currency.clone(),
            breakdown: QuoteBreakdown {
                unit: row.unit.clone(),
                area_m2: calc.area_m2,
                rate: row.unit_price,
            },
            meta: QuoteMeta {
                product_id: row.id.clone(),
                description: row.description(),
            },
            row: row.clone(),
            calc,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::DIMENSIONS_REQUIRED_MESSAGE;

    struct Text(&'static str);

    impl CatalogSource for Text {
        fn read_catalog(&self) -> PricingResult<String> {
            Ok(self.0.to_owned())
        }

        fn origin(&self) -> String {
            "inline".into()
        }
    }

    const CATALOG: &str = "\
Group,Category,Sides,Variables,Size,Material,Finish,Notes,VAT,Price,Unit,Ink,Sheet,Lamination,Other
Signs,Banner,Single,None,Custom,PVC,Hemmed,,20%,£10.00,sq/m,,,,
Print,Flyer,Double,None,A5,Silk,Matt,,20%,£0.25,each,,,,
Print,Flyer,Double,None,A4,Silk,Matt,,20%,£0.40,each,,,,";

    fn pricer() -> CatalogPricer<Text> {
        CatalogPricer::new(Arc::new(CatalogCache::new(Text(CATALOG))), "GBP")
    }

    fn banner(height: Option<f64>, width: Option<f64>) -> CatalogRequest {
        CatalogRequest {
            product_group: "Signs".into(),
            product_category: "Banner".into(),
            quantity: Some(2.0),
            dimensions: Dimensions {
                height_mm: height,
                width_mm: width,
            },
            ..CatalogRequest::default()
        }
    }

    #[test]
    fn quotes_area_priced_row() {
        let quote = pricer().quote(&banner(Some(1000.0), Some(500.0))).unwrap();
        assert_eq!(quote.unit_price, 5.0);
        assert_eq!(quote.net_total, 10.0);
        assert_eq!(quote.vat_total, 2.0);
        assert_eq!(quote.gross_total, 12.0);
        assert_eq!(quote.currency, "GBP");
        assert_eq!(quote.breakdown.area_m2, Some(0.5));
        assert_eq!(quote.breakdown.rate, 10.0);
        assert_eq!(quote.meta.product_id.as_str(), "row-1");
        assert_eq!(quote.meta.description, "Banner - Custom PVC");
    }

    #[test]
    fn missing_dimensions_on_area_row_is_rejected() {
        let err = pricer().quote(&banner(Some(1000.0), None)).unwrap_err();
        assert_eq!(err, PricingError::validation(DIMENSIONS_REQUIRED_MESSAGE));
    }

    #[test]
    fn filters_select_the_row() {
        let request = CatalogRequest {
            product_group: "Print".into(),
            product_category: "Flyer".into(),
            options: CatalogFilter {
                size: Some("A4".into()),
                ..CatalogFilter::default()
            },
            quantity: Some(100.0),
            ..CatalogRequest::default()
        };
        let quote = pricer().quote(&request).unwrap();
        assert_eq!(quote.meta.product_id.as_str(), "row-3");
        assert_eq!(quote.unit_price, 0.4);
        assert_eq!(quote.breakdown.area_m2, None);
    }

    #[test]
    fn unmatched_filters_are_not_found_rather_than_free() {
        let request = CatalogRequest {
            product_group: "Print".into(),
            product_category: "Poster".into(),
            quantity: Some(1.0),
            ..CatalogRequest::default()
        };
        let err = pricer().quote(&request).unwrap_err();
        assert_eq!(err, PricingError::not_found(NO_PRODUCT_MESSAGE));
    }

    #[test]
    fn options_list_distinct_values() {
        assert_eq!(pricer().options(CatalogField::Size).unwrap(), vec!["A4", "A5", "Custom"]);
    }

    #[test]
    fn request_deserializes_from_camel_case_json() {
        let request: CatalogRequest = serde_json::from_value(serde_json::json!({
            "productGroup": "Signs",
            "productCategory": "Banner",
            "options": { "material": "PVC" },
            "quantity": 1,
            "dimensions": { "heightMm": 2000, "widthMm": 1000 }
        }))
        .unwrap();
        assert_eq!(request.options.material.as_deref(), Some("PVC"));
        assert_eq!(request.dimensions.width_mm, Some(1000.0));

        let json = serde_json::to_value(pricer().quote(&request).unwrap()).unwrap();
        assert_eq!(json["grossTotal"], 24.0);
        assert_eq!(json["breakdown"]["areaM2"], 2.0);
        assert_eq!(json["meta"]["productId"], "row-1");
    }
}
