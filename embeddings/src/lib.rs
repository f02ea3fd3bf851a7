//! # Embeddings
//!
//! Vector math and embedding providers used by the tab grouping engine.
//!
//! ## Features
//!
//! - **Similarity**: Strict cosine similarity/distance over dense vectors
//! - **Providers**: An async [`EmbeddingProvider`] seam, with an
//!   OpenAI-compatible HTTP implementation
//! - **Caching**: Bounded embedding cache so repeated tab texts are embedded once
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Embeddings                                   │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  EmbeddingProvider ──► Embedding ──► cosine_distance           │
//! │       │                                   │                     │
//! │       ▼                                   ▼                     │
//! │  OpenAI / CachedProvider           clustering, matching         │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod cache;
pub mod error;
pub mod provider;
pub mod similarity;

pub use cache::{CachedProvider, EmbeddingCache};
pub use error::{EmbeddingError, Result};
pub use provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, OpenAIProvider};
pub use similarity::{SimilarityResult, cosine_distance, cosine_similarity, find_top_k};

/// A dense vector embedding.
pub type Embedding = Vec<f32>;

/// Dimension of embeddings (varies by model).
pub const DEFAULT_DIMENSION: usize = 1536; // OpenAI text-embedding-3-small
