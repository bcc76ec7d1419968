//! `forgeprice-core` — shared building blocks for the pricing workspace.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! the error taxonomy, strongly-typed identifiers and the entity/value markers.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{ErrorKind, PricingError, PricingResult};
pub use id::{CatalogRowId, ItemId, RuleId};
pub use value_object::ValueObject;
