//! Entity traits: identity + authorship.

/// Entity marker + minimal interface.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Copy + Eq + core::hash::Hash + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> Self::Id;
}

/// An entity written by a registered user.
///
/// The author is fixed at creation; only the author may later mutate or
/// remove the entity.
pub trait Authored: Entity {
    fn author_id(&self) -> crate::UserId;
}
