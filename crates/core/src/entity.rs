//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + Into<i64>;

    /// Human-readable resource name, used in not-found messages.
    const RESOURCE: &'static str;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}
