//! Density-based clustering for embedding vectors.
//!
//! The engine clusters an insertion-ordered map of embeddings with a
//! permissive DBSCAN over cosine distance; [`suggest_epsilon`] estimates a
//! radius from the k-distance distribution when none is configured.
//!
//! ```text
//! IndexMap<K, Embedding> ──► suggest_epsilon(k) ──► epsilon
//!            │                                        │
//!            └──────────────► Dbscan { epsilon, min_points }
//!                                        │
//!                                        ▼
//!                     ClusterResult { clusters, noise }
//! ```

pub mod dbscan;
pub mod epsilon;
pub mod error;

pub use dbscan::{
    ClusterResult, DEFAULT_EPSILON, DEFAULT_MIN_POINTS, Dbscan, MAX_EPSILON, cluster,
};
pub use epsilon::{DEFAULT_K, FALLBACK_EPSILON, k_distances, suggest_epsilon};
pub use error::{ClusterError, Result};
