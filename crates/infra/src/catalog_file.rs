//! File-backed catalog source and the process-wide catalog cache.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tracing::{error, info};

use forgeprice_core::{PricingError, PricingResult};
use forgeprice_pricing::catalog::CatalogCache;
use forgeprice_pricing::store::CatalogSource;

use crate::config::PricingConfig;

pub const MISSING_FILE_MESSAGE: &str = "Pricing data file missing.";

/// Reads the price list from a UTF-8 CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CatalogSource for FileCatalogSource {
    fn read_catalog(&self) -> PricingResult<String> {
        if !self.path.exists() {
            error!(path = %self.path.display(), "catalog file missing");
            return Err(PricingError::data_source(MISSING_FILE_MESSAGE));
        }
        std::fs::read_to_string(&self.path).map_err(|e| {
            error!(path = %self.path.display(), error = %e, "catalog file unreadable");
            PricingError::data_source(format!("Pricing data file unreadable: {e}"))
        })
    }

    fn origin(&self) -> String {
        self.path.display().to_string()
    }
}

static SHARED_CATALOG: OnceLock<Arc<CatalogCache<FileCatalogSource>>> = OnceLock::new();

/// The process-wide catalog cache.
///
/// Created on first call from that call's configuration; later calls return
/// the same cache regardless of `config`. Use [`CatalogCache::reload`] to pick
/// up a changed file.
pub fn shared_catalog(config: &PricingConfig) -> Arc<CatalogCache<FileCatalogSource>> {
    let cache = SHARED_CATALOG.get_or_init(|| {
        info!(path = %config.catalog_path.display(), "initializing shared catalog cache");
        Arc::new(CatalogCache::new(FileCatalogSource::new(config.catalog_path.clone())))
    });
    Arc::clone(cache)
}
