//! # Generation Error Types
//!
//! All errors that can occur while generating a cave.

use thiserror::Error;

/// Errors that can occur in the generation pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Height or width was zero.
    #[error("invalid dimensions: {height}x{width} (both must be greater than zero)")]
    InvalidDimensions {
        /// Requested number of rows.
        height: usize,
        /// Requested number of columns.
        width: usize,
    },

    /// A grid accessor was called with indices outside the grid.
    ///
    /// Engine code only indexes validated coordinates, so seeing this
    /// past the public grid API is a logic error.
    #[error("cell ({row}, {col}) out of bounds for {height}x{width} grid")]
    OutOfBounds {
        /// Row that was accessed.
        row: usize,
        /// Column that was accessed.
        col: usize,
        /// Grid height.
        height: usize,
        /// Grid width.
        width: usize,
    },

    /// Room carving left part of a room unreachable from the others.
    #[error("connectivity violation: {unreached} room cells unreachable across {rooms} rooms")]
    ConnectivityViolation {
        /// Number of room cells the flood fill did not reach.
        unreached: usize,
        /// Number of rooms that were placed.
        rooms: usize,
    },

    /// Invalid configuration value or file.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The OS refused to hand out entropy for a fresh seed.
    #[error("entropy source unavailable: {0}")]
    Entropy(String),
}

/// Result type for generation operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
