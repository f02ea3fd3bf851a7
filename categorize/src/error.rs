//! Error types for tab categorization.

use thiserror::Error;

/// Result type alias for categorization operations.
pub type Result<T> = std::result::Result<T, CategorizeError>;

/// Errors that can occur while categorizing or organizing tabs.
///
/// Embedding failures during a run are recovered inside the pipeline; these
/// variants surface only caller errors and storage failures.
#[derive(Error, Debug)]
pub enum CategorizeError {
    /// A taxonomy table refers to a category it does not declare.
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// Two input items share an id.
    #[error("duplicate item id: {0}")]
    DuplicateItemId(crate::item::ItemId),

    /// A color name outside the palette.
    #[error("unknown color: {0}")]
    UnknownColor(String),

    /// Clustering rejected its input.
    #[error("cluster error: {0}")]
    Cluster(#[from] taborg_cluster::ClusterError),

    /// Similarity or provider error that could not be recovered.
    #[error("embedding error: {0}")]
    Embedding(#[from] taborg_embeddings::EmbeddingError),

    /// A sink refused to create a group.
    #[error("sink error: {0}")]
    Sink(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
