//! Catalog path: static price list loading, lookup and quoting.

pub mod cache;
pub mod loader;
pub mod matcher;
pub mod pricer;
pub mod row;

pub use cache::{CatalogCache, CatalogSnapshot};
pub use loader::{ParsedCatalog, parse_catalog};
pub use matcher::{CatalogField, CatalogFilter, distinct, find_row};
pub use pricer::{CatalogPricer, CatalogQuote, CatalogRequest, Dimensions, QuoteBreakdown, QuoteMeta};
pub use row::{AREA_UNIT, CatalogRow};
