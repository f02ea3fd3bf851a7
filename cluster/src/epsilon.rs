//! Epsilon estimation from the k-distance distribution.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use taborg_embeddings::{Embedding, cosine_distance};
use tracing::debug;

use crate::dbscan::check_dimensions;
use crate::error::{ClusterError, Result};

/// Default neighbor rank for the k-distance heuristic.
pub const DEFAULT_K: usize = 4;

/// Returned when no item has at least `k` others.
pub const FALLBACK_EPSILON: f32 = 0.4;

/// Sorted distances from each item to its k-th nearest other item.
///
/// Items with fewer than `k` others contribute nothing, so the result is
/// empty whenever the map holds `k` items or fewer.
pub fn k_distances<K>(embeddings: &IndexMap<K, Embedding>, k: usize) -> Result<Vec<f32>> {
    if k == 0 {
        return Err(ClusterError::InvalidParameter {
            name: "k",
            message: "must be at least 1".to_string(),
        });
    }
    check_dimensions(embeddings)?;

    let vectors: Vec<&[f32]> = embeddings.values().map(Vec::as_slice).collect();
    let mut k_dists = Vec::with_capacity(vectors.len());

    for (i, query) in vectors.iter().enumerate() {
        let mut distances = Vec::with_capacity(vectors.len().saturating_sub(1));
        for (j, other) in vectors.iter().enumerate() {
            if i != j {
                distances.push(cosine_distance(query, other)?);
            }
        }

        if distances.len() >= k {
            distances.sort_by_key(|d| OrderedFloat(*d));
            k_dists.push(distances[k - 1]);
        }
    }

    k_dists.sort_by_key(|d| OrderedFloat(*d));
    Ok(k_dists)
}

/// Suggest an epsilon for [`crate::Dbscan`]: the 80th percentile of the
/// k-distances, or [`FALLBACK_EPSILON`] when there are none.
///
/// The result is always one of the observed k-distances, so it lies between
/// the smallest and largest of them.
pub fn suggest_epsilon<K>(embeddings: &IndexMap<K, Embedding>, k: usize) -> Result<f32> {
    let k_dists = k_distances(embeddings, k)?;

    // floor(n * 0.8) without float rounding
    let elbow = k_dists.len() * 4 / 5;
    let epsilon = k_dists.get(elbow).copied().unwrap_or(FALLBACK_EPSILON);

    debug!(k, samples = k_dists.len(), epsilon, "suggested epsilon");
    Ok(epsilon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(degrees: f32) -> Embedding {
        let radians = degrees.to_radians();
        vec![radians.cos(), radians.sin()]
    }

    #[test]
    fn test_zero_k_is_rejected() {
        let embeddings: IndexMap<u64, Embedding> = [(1, at(0.0)), (2, at(10.0))].into();
        assert!(matches!(
            suggest_epsilon(&embeddings, 0),
            Err(ClusterError::InvalidParameter { name: "k", .. })
        ));
    }

    #[test]
    fn test_too_few_items_fall_back() {
        let empty: IndexMap<u64, Embedding> = IndexMap::new();
        assert_eq!(suggest_epsilon(&empty, DEFAULT_K).unwrap(), FALLBACK_EPSILON);

        let four: IndexMap<u64, Embedding> =
            (0..4).map(|i| (i, at(i as f32 * 10.0))).collect();
        assert!(k_distances(&four, 4).unwrap().is_empty());
        assert_eq!(suggest_epsilon(&four, 4).unwrap(), FALLBACK_EPSILON);
    }

    #[test]
    fn test_picks_eightieth_percentile() {
        let embeddings: IndexMap<u64, Embedding> =
            [(1, at(0.0)), (2, at(10.0)), (3, at(90.0))].into();

        let k_dists = k_distances(&embeddings, 1).unwrap();
        assert_eq!(k_dists.len(), 3);

        // floor(3 * 0.8) = 2, the isolated item's distance to its nearest
        let expected = 1.0 - 80f32.to_radians().cos();
        let epsilon = suggest_epsilon(&embeddings, 1).unwrap();
        assert!((epsilon - expected).abs() < 1e-4);
    }

    #[test]
    fn test_identical_vectors_suggest_zero() {
        // A zero suggestion is kept as-is rather than replaced by the fallback.
        let embeddings: IndexMap<u64, Embedding> =
            (0..6).map(|i| (i, vec![0.5, 0.5, 0.5])).collect();
        let epsilon = suggest_epsilon(&embeddings, 2).unwrap();
        assert!(epsilon.abs() < 1e-6);
    }

    #[test]
    fn test_result_is_within_observed_bounds() {
        let embeddings: IndexMap<u64, Embedding> =
            (0..12).map(|i| (i, at(i as f32 * 13.0))).collect();

        let k_dists = k_distances(&embeddings, DEFAULT_K).unwrap();
        let epsilon = suggest_epsilon(&embeddings, DEFAULT_K).unwrap();

        assert!(epsilon >= k_dists[0]);
        assert!(epsilon <= k_dists[k_dists.len() - 1]);
        assert!((0.0..=2.0).contains(&epsilon));
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let embeddings: IndexMap<u64, Embedding> =
            [(1, vec![1.0, 0.0]), (2, vec![1.0])].into();
        assert!(matches!(
            k_distances(&embeddings, 1),
            Err(ClusterError::DimensionMismatch { .. })
        ));
    }
}
