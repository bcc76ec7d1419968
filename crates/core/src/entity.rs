//! Entity trait: records that keep their identity across edits.

/// A persisted definition (rule, item) addressed by a stable identifier.
///
/// Stores key records by [`Entity::id`]; an update is a save with an existing id.
pub trait Entity {
    type Id: Clone + Eq + Ord + core::hash::Hash + core::fmt::Debug;

    fn id(&self) -> &Self::Id;

    /// `true` when `other` is the same record (possibly in a different revision).
    fn is_same_record(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
