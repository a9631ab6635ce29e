//! # Component System
//!
//! Components are plain data rows with no behavior. Every component type
//! must be registered with the [`World`](super::World) before the first
//! entity is created; registration assigns it a [`ComponentId`].

/// Marker trait for ECS components.
///
/// Components must be:
/// - `Default`: attaching a component resets its row to the default value
/// - `'static`: pools are stored type-erased and recovered by downcast
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Debug, Default)]
/// struct Location {
///     x: i32,
///     y: i32,
/// }
///
/// impl Component for Location {}
/// ```
pub trait Component: Default + 'static {}

/// Runtime identifier of a registered component type.
///
/// Ids are assigned in registration order starting at 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct ComponentId(pub(crate) u8);

impl ComponentId {
    /// Returns the id as a pool index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}
