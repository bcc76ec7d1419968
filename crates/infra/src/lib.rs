//! Infrastructure layer: concrete stores, catalog file access, config.

pub mod catalog_file;
pub mod config;
pub mod store;


pub use catalog_file::{FileCatalogSource, shared_catalog};
pub use config::PricingConfig;
pub use store::{InMemoryItemStore, InMemoryRuleStore};
