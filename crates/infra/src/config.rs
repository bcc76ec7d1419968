//! Configuration loading and representation.

use std::path::PathBuf;

use tracing::debug;

use forgeprice_core::{PricingError, PricingResult};
use forgeprice_pricing::formula::DEFAULT_STEP_LIMIT;

pub const CATALOG_PATH_VAR: &str = "PRICING_CATALOG_PATH";
pub const CURRENCY_VAR: &str = "PRICING_CURRENCY";
pub const STEP_LIMIT_VAR: &str = "PRICING_FORMULA_STEP_LIMIT";

pub const DEFAULT_CATALOG_PATH: &str = "constants/pricing_data.csv";
pub const DEFAULT_CURRENCY: &str = "GBP";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricingConfig {
    pub catalog_path: PathBuf,
    pub currency: String,
    pub formula_step_limit: usize,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from(DEFAULT_CATALOG_PATH),
            currency: DEFAULT_CURRENCY.to_string(),
            formula_step_limit: DEFAULT_STEP_LIMIT,
        }
    }
}

impl PricingConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> PricingResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; unset or blank keys use defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PricingResult<Self> {
        let get = |key: &str| {
            let value = lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
            if value.is_none() {
                debug!(key, "config key not set; using default");
            }
            value
        };

        let mut config = Self::default();
        if let Some(path) = get(CATALOG_PATH_VAR) {
            config.catalog_path = PathBuf::from(path);
        }
        if let Some(currency) = get(CURRENCY_VAR) {
            config.currency = currency.to_uppercase();
        }
        if let Some(raw) = get(STEP_LIMIT_VAR) {
            config.formula_step_limit = raw
                .parse::<usize>()
                .ok()
                .filter(|limit| *limit > 0)
                .ok_or_else(|| {
                    PricingError::validation(format!(
                        "{STEP_LIMIT_VAR} must be a positive integer, got '{raw}'"
                    ))
                })?;
        }
        Ok(config)
    }
}
