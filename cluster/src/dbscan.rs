//! Density-based clustering (DBSCAN) over cosine distance.
//!
//! Items are visited in map order. An item with at least `min_points` other
//! items within `epsilon` is a core point and seeds a cluster, which then
//! grows breadth-first:
//!
//! ```text
//!   seed ──► queue = neighbors(seed)
//!              │
//!              ▼
//!   pop c ── already processed? ── yes ──► skip
//!              │ no
//!              ▼
//!   unvisited? ── yes ──► visit; core? ──► enqueue unprocessed neighbors
//!              │
//!              ▼
//!   not yet in a cluster? ──► add to current cluster
//! ```
//!
//! Every popped candidate joins the cluster, including ones visited earlier
//! in the main loop and left as noise at the time. Items that never join a
//! cluster are reported as noise, in map order.

use std::collections::HashSet;
use std::collections::VecDeque;
use std::hash::Hash;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use taborg_embeddings::{Embedding, cosine_distance};
use tracing::{debug, info};

use crate::error::{ClusterError, Result};

/// Default neighborhood radius, in cosine distance.
pub const DEFAULT_EPSILON: f32 = 0.4;

/// Default neighbor count for a core point.
pub const DEFAULT_MIN_POINTS: usize = 2;

/// Largest meaningful cosine distance.
pub const MAX_EPSILON: f32 = 2.0;

/// Output of a clustering run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterResult<K> {
    /// Clusters in creation order; members in the order they joined.
    pub clusters: Vec<Vec<K>>,

    /// Items that joined no cluster, in map order.
    pub noise: Vec<K>,
}

impl<K> Default for ClusterResult<K> {
    fn default() -> Self {
        Self {
            clusters: Vec::new(),
            noise: Vec::new(),
        }
    }
}

impl<K: PartialEq> ClusterResult<K> {
    /// Total number of items across clusters and noise.
    pub fn len(&self) -> usize {
        self.clusters.iter().map(Vec::len).sum::<usize>() + self.noise.len()
    }

    /// True when the run had no items.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of clusters.
    pub fn num_clusters(&self) -> usize {
        self.clusters.len()
    }

    /// Index of the cluster containing `key`, if any.
    pub fn cluster_of(&self, key: &K) -> Option<usize> {
        self.clusters
            .iter()
            .position(|members| members.contains(key))
    }

    /// Keep clusters with at least `min_size` members.
    ///
    /// Returns the kept clusters and every other item (members of smaller
    /// clusters first, then noise).
    pub fn split_by_min_size(self, min_size: usize) -> (Vec<Vec<K>>, Vec<K>) {
        let mut kept = Vec::new();
        let mut leftover = Vec::new();

        for members in self.clusters {
            if members.len() >= min_size {
                kept.push(members);
            } else {
                leftover.extend(members);
            }
        }
        leftover.extend(self.noise);

        (kept, leftover)
    }
}

/// DBSCAN configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dbscan {
    /// Maximum cosine distance for two items to be neighbors.
    epsilon: f32,

    /// Minimum neighbor count (excluding the item itself) for a core point.
    min_points: usize,
}

impl Default for Dbscan {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_EPSILON,
            min_points: DEFAULT_MIN_POINTS,
        }
    }
}

impl Dbscan {
    /// Create a clusterer with the given radius and core threshold.
    pub fn new(epsilon: f32, min_points: usize) -> Self {
        Self {
            epsilon,
            min_points,
        }
    }

    /// Set epsilon.
    pub fn with_epsilon(mut self, epsilon: f32) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the core point threshold.
    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    /// Neighborhood radius, as a cosine distance.
    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Neighbors, not counting the point itself, a core point needs.
    pub fn min_points(&self) -> usize {
        self.min_points
    }

    fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || !(0.0..=MAX_EPSILON).contains(&self.epsilon) {
            return Err(ClusterError::InvalidParameter {
                name: "epsilon",
                message: format!("must be a finite value in [0, 2], got {}", self.epsilon),
            });
        }
        if self.min_points == 0 {
            return Err(ClusterError::InvalidParameter {
                name: "min_points",
                message: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Cluster the embeddings.
    ///
    /// Parameters and dimensions are validated before any distance is
    /// computed. An empty map yields an empty result.
    pub fn cluster<K>(&self, embeddings: &IndexMap<K, Embedding>) -> Result<ClusterResult<K>>
    where
        K: Clone + Eq + Hash,
    {
        self.validate()?;
        check_dimensions(embeddings)?;

        debug!(
            epsilon = self.epsilon,
            min_points = self.min_points,
            points = embeddings.len(),
            "starting dbscan"
        );

        let vectors: Vec<&[f32]> = embeddings.values().map(Vec::as_slice).collect();
        let n = vectors.len();

        let mut visited = vec![false; n];
        let mut clustered = vec![false; n];
        let mut clusters: Vec<Vec<usize>> = Vec::new();

        for seed in 0..n {
            if visited[seed] {
                continue;
            }
            visited[seed] = true;

            let neighbors = self.neighbors(&vectors, seed)?;
            if neighbors.len() < self.min_points {
                // Noise for now; a later expansion may still absorb it.
                continue;
            }

            let mut members = vec![seed];
            clustered[seed] = true;

            let mut queue: VecDeque<usize> = neighbors.into();
            let mut processed: HashSet<usize> = HashSet::from([seed]);

            while let Some(candidate) = queue.pop_front() {
                if !processed.insert(candidate) {
                    continue;
                }

                if !visited[candidate] {
                    visited[candidate] = true;

                    let candidate_neighbors = self.neighbors(&vectors, candidate)?;
                    if candidate_neighbors.len() >= self.min_points {
                        queue.extend(
                            candidate_neighbors
                                .into_iter()
                                .filter(|neighbor| !processed.contains(neighbor)),
                        );
                    }
                }

                if !clustered[candidate] {
                    clustered[candidate] = true;
                    members.push(candidate);
                }
            }

            debug!(size = members.len(), "created cluster");
            clusters.push(members);
        }

        let keys: Vec<&K> = embeddings.keys().collect();
        let result = ClusterResult {
            clusters: clusters
                .into_iter()
                .map(|members| members.into_iter().map(|i| keys[i].clone()).collect())
                .collect(),
            noise: (0..n)
                .filter(|&i| !clustered[i])
                .map(|i| keys[i].clone())
                .collect(),
        };

        info!(
            clusters = result.clusters.len(),
            noise = result.noise.len(),
            "dbscan complete"
        );

        Ok(result)
    }

    /// All other items within epsilon of `idx`, in map order.
    fn neighbors(&self, vectors: &[&[f32]], idx: usize) -> Result<Vec<usize>> {
        let query = vectors[idx];
        let mut neighbors = Vec::new();

        for (other, vector) in vectors.iter().enumerate() {
            if other == idx {
                continue;
            }
            if cosine_distance(query, vector)? <= self.epsilon {
                neighbors.push(other);
            }
        }

        Ok(neighbors)
    }
}

/// Cluster `embeddings` with the given parameters.
pub fn cluster<K>(
    embeddings: &IndexMap<K, Embedding>,
    epsilon: f32,
    min_points: usize,
) -> Result<ClusterResult<K>>
where
    K: Clone + Eq + Hash,
{
    Dbscan::new(epsilon, min_points).cluster(embeddings)
}

/// Fail unless every vector has the dimension of the first one.
pub(crate) fn check_dimensions<K>(embeddings: &IndexMap<K, Embedding>) -> Result<()> {
    let mut vectors = embeddings.values();
    let Some(first) = vectors.next() else {
        return Ok(());
    };

    let expected = first.len();
    match vectors.find(|v| v.len() != expected) {
        Some(v) => Err(ClusterError::DimensionMismatch {
            expected,
            found: v.len(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(degrees: f32) -> Embedding {
        let radians = degrees.to_radians();
        vec![radians.cos(), radians.sin()]
    }

    fn map(entries: Vec<(u64, Embedding)>) -> IndexMap<u64, Embedding> {
        entries.into_iter().collect()
    }

    #[test]
    fn test_tight_group_with_isolated_points() {
        let embeddings = map(vec![
            (1, vec![1.0, 0.0, 0.0, 0.0]),
            (2, vec![0.99, 0.1, 0.0, 0.0]),
            (3, vec![0.98, 0.0, 0.15, 0.0]),
            (4, vec![-0.2, -1.0, 0.0, 0.0]),
            (5, vec![-0.2, 0.5, -1.0, 0.0]),
        ]);

        let result = cluster(&embeddings, 0.3, 2).unwrap();
        assert_eq!(result.clusters, vec![vec![1, 2, 3]]);
        assert_eq!(result.noise, vec![4, 5]);
        assert_eq!(result.len(), 5);
    }

    #[test]
    fn test_early_noise_is_absorbed_by_later_cluster() {
        // 0 and 45 are too far apart; 25 bridges both.
        let embeddings = map(vec![(0, at(0.0)), (25, at(25.0)), (45, at(45.0))]);

        let result = cluster(&embeddings, 0.1, 2).unwrap();
        assert_eq!(result.clusters, vec![vec![25, 0, 45]]);
        assert!(result.noise.is_empty());
    }

    #[test]
    fn test_empty_input_is_empty_result() {
        let embeddings: IndexMap<u64, Embedding> = IndexMap::new();
        let result = Dbscan::default().cluster(&embeddings).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.num_clusters(), 0);
    }

    #[test]
    fn test_single_item_is_noise() {
        let embeddings = map(vec![(7, at(10.0))]);
        let result = Dbscan::default().cluster(&embeddings).unwrap();
        assert!(result.clusters.is_empty());
        assert_eq!(result.noise, vec![7]);
    }

    #[test]
    fn test_min_points_one_leaves_isolated_items_as_noise() {
        let embeddings = map(vec![(1, at(0.0)), (2, at(5.0)), (3, at(90.0))]);
        let result = cluster(&embeddings, 0.05, 1).unwrap();
        assert_eq!(result.clusters, vec![vec![1, 2]]);
        assert_eq!(result.noise, vec![3]);
    }

    #[test]
    fn test_invalid_parameters_fail_fast() {
        let embeddings = map(vec![(1, at(0.0))]);

        for epsilon in [-0.1, 2.5, f32::NAN, f32::INFINITY] {
            let err = cluster(&embeddings, epsilon, 2).unwrap_err();
            assert!(matches!(
                err,
                ClusterError::InvalidParameter {
                    name: "epsilon",
                    ..
                }
            ));
        }

        let err = cluster(&embeddings, 0.3, 0).unwrap_err();
        assert!(matches!(
            err,
            ClusterError::InvalidParameter {
                name: "min_points",
                ..
            }
        ));
    }

    #[test]
    fn test_dimension_mismatch_is_rejected() {
        let embeddings = map(vec![(1, vec![1.0, 0.0]), (2, vec![1.0, 0.0, 0.0])]);
        let err = cluster(&embeddings, 0.3, 2).unwrap_err();
        assert!(matches!(
            err,
            ClusterError::DimensionMismatch {
                expected: 2,
                found: 3
            }
        ));
    }

    #[test]
    fn test_builder_overrides_defaults() {
        let dbscan = Dbscan::default().with_epsilon(0.25).with_min_points(3);
        assert_eq!(dbscan.epsilon(), 0.25);
        assert_eq!(dbscan.min_points(), 3);
    }

    #[test]
    fn test_split_by_min_size() {
        let result = ClusterResult {
            clusters: vec![vec![1, 2, 3], vec![4]],
            noise: vec![5],
        };

        assert_eq!(result.cluster_of(&4), Some(1));
        assert_eq!(result.cluster_of(&5), None);

        let (kept, leftover) = result.split_by_min_size(2);
        assert_eq!(kept, vec![vec![1, 2, 3]]);
        assert_eq!(leftover, vec![4, 5]);
    }
}
