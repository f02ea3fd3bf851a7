//! Batched embedding with per-batch failure recovery.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use taborg_embeddings::{Embedding, EmbeddingProvider};
use tracing::{debug, warn};

use crate::item::ItemId;

/// Vectors collected from a run of batches.
#[derive(Debug, Default)]
pub(crate) struct EmbeddedBatches {
    pub vectors: HashMap<ItemId, Embedding>,
    pub attempted: usize,
    pub failed: usize,
}

impl EmbeddedBatches {
    /// True when batches were sent and none of them came back.
    pub fn all_failed(&self) -> bool {
        self.attempted > 0 && self.failed == self.attempted
    }
}

/// Embed `(id, text)` pairs in batches of `batch_size`.
///
/// A batch that errors, times out against the remaining `budget`, or returns
/// the wrong number of vectors is skipped with a warning. Vectors whose
/// dimension differs from the first one received are dropped. Once the budget
/// is spent no further batches are sent.
pub(crate) async fn embed_in_batches(
    provider: &dyn EmbeddingProvider,
    texts: Vec<(ItemId, String)>,
    batch_size: usize,
    budget: Option<Duration>,
) -> EmbeddedBatches {
    let started = Instant::now();
    let mut out = EmbeddedBatches::default();
    let mut dimension: Option<usize> = None;

    for batch in texts.chunks(batch_size.max(1)) {
        let remaining = match budget {
            Some(budget) => match budget.checked_sub(started.elapsed()) {
                Some(left) if !left.is_zero() => Some(left),
                _ => {
                    warn!(
                        provider = provider.name(),
                        "embedding budget spent; skipping remaining batches"
                    );
                    break;
                }
            },
            None => None,
        };

        out.attempted += 1;
        let inputs: Vec<String> = batch.iter().map(|(_, text)| text.clone()).collect();

        let result = match remaining {
            Some(left) => match tokio::time::timeout(left, provider.embed_texts(&inputs)).await {
                Ok(result) => result,
                Err(_) => {
                    out.failed += 1;
                    warn!(
                        provider = provider.name(),
                        size = batch.len(),
                        "embedding batch timed out"
                    );
                    continue;
                }
            },
            None => provider.embed_texts(&inputs).await,
        };

        let vectors = match result {
            Ok(vectors) => vectors,
            Err(e) => {
                out.failed += 1;
                warn!(
                    provider = provider.name(),
                    size = batch.len(),
                    error = %e,
                    "embedding batch failed"
                );
                continue;
            }
        };

        for ((id, _), vector) in batch.iter().zip(vectors) {
            if vector.is_empty() {
                warn!(id, "dropping empty embedding");
                continue;
            }
            let expected = *dimension.get_or_insert(vector.len());
            if vector.len() != expected {
                warn!(id, expected, actual = vector.len(), "dropping mismatched embedding");
                continue;
            }
            out.vectors.insert(*id, vector);
        }
    }

    debug!(
        embedded = out.vectors.len(),
        batches = out.attempted,
        failed = out.failed,
        "embedding pass complete"
    );
    out
}
