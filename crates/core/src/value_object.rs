//! Value object marker: compared by value, never by identity.

/// Marker for immutable values such as requested dimensions or a computed
/// price breakdown.
///
/// Two value objects with the same attributes are interchangeable; "changing"
/// one means building a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
