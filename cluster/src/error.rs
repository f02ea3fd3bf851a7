//! Error types for the clustering engine.

use thiserror::Error;

/// Result type alias for clustering operations.
pub type Result<T> = std::result::Result<T, ClusterError>;

/// Errors returned by the clustering engine and epsilon estimator.
///
/// Only caller errors live here; degenerate input (no items, a single item,
/// all-zero vectors) produces a trivial result instead.
#[derive(Error, Debug)]
pub enum ClusterError {
    /// Invalid parameter value.
    #[error("invalid parameter {name}: {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Human-readable explanation.
        message: String,
    },

    /// Vectors in one run have different lengths.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Dimension of the first vector in the map.
        expected: usize,
        /// Offending dimension.
        found: usize,
    },

    /// Similarity computation failed.
    #[error(transparent)]
    Similarity(#[from] taborg_embeddings::EmbeddingError),
}
