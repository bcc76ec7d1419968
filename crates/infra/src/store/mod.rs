//! In-memory implementations of the pricing repositories.
//!
//! Intended for tests/dev and for hosts that load definitions at startup.

pub mod items;
pub mod rules;

pub use items::InMemoryItemStore;
pub use rules::InMemoryRuleStore;

use forgeprice_core::PricingError;

pub(crate) fn poisoned(what: &str) -> PricingError {
    PricingError::data_source(format!("{what} store lock poisoned"))
}
