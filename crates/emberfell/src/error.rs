//! # Simulation Error Types
//!
//! Errors from loading configuration and content, and from replacing
//! region data. Nothing in the per-tick path returns these; tick-time
//! failures are logged and degrade in place.

use emberfell_core::StoreError;
use thiserror::Error;

/// Errors that can occur while setting up a simulation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A configuration document failed to parse or validate.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A content document failed to parse or validate.
    #[error("invalid content: {0}")]
    InvalidContent(String),

    /// A content table referenced a name that does not exist.
    #[error("unknown {kind} '{name}'")]
    UnknownReference {
        /// Table the name was looked up in.
        kind: &'static str,
        /// The missing name.
        name: String,
    },

    /// A navigation grid exceeds the configured bounds.
    #[error("navgrid too large: {width}x{height}, max {max_width}x{max_height}")]
    NavGridTooLarge {
        /// Requested width.
        width: usize,
        /// Requested height.
        height: usize,
        /// Configured maximum width.
        max_width: usize,
        /// Configured maximum height.
        max_height: usize,
    },

    /// Navigation grid data does not match its dimensions.
    #[error("navgrid data size mismatch: expected {expected} cells, got {actual}")]
    NavGridSizeMismatch {
        /// `width * height`.
        expected: usize,
        /// Cells supplied.
        actual: usize,
    },

    /// A file could not be read.
    #[error("io error: {0}")]
    Io(String),

    /// The entity store rejected a setup operation.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result type for simulation setup operations.
pub type SimResult<T> = Result<T, SimError>;
