//! # Entity Store Error Types
//!
//! Errors from the fallible setup paths of the entity store.

use thiserror::Error;

/// Errors that can occur in the entity store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Every entity slot is occupied.
    #[error("entity store full: capacity {capacity}")]
    StoreFull {
        /// Number of slots.
        capacity: usize,
    },

    /// Component types must be registered before the first entity exists.
    #[error("component registration is closed once entities exist")]
    RegistrationClosed,

    /// The component type limit was reached.
    #[error("too many component types: max {max}")]
    TooManyComponentTypes {
        /// The configured limit.
        max: usize,
    },

    /// A component type was used without being registered.
    #[error("component {name} was never registered")]
    UnregisteredComponent {
        /// Type name of the component.
        name: &'static str,
    },
}

/// Result type for entity store operations.
pub type StoreResult<T> = Result<T, StoreError>;
