//! Hybrid categorization pipeline.
//!
//! Items flow through strictly ordered phases, each working on what the
//! previous one left behind:
//!
//! ```text
//! items ─► 1. domain lookup ──────────────► category buckets
//!              │ unmatched
//!              ▼
//!          provider? ── no ──► 4. keyword match ─► buckets / Others
//!              │ yes
//!              ▼
//!          2. semantic match against bucket representatives
//!              │ unmatched
//!              ▼
//!          3. DBSCAN over the rest ─► named groups / Others
//! ```
//!
//! Embedding failures never lose items: whatever cannot be embedded ends up
//! in Others.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use taborg_cluster::{Dbscan, MAX_EPSILON};
use taborg_embeddings::{Embedding, EmbeddingProvider, find_top_k};
use tracing::{debug, info, warn};

use crate::color::{ColorPicker, GroupColor};
use crate::embed::embed_in_batches;
use crate::error::Result;
use crate::item::{Item, ItemId, ensure_unique_ids};
use crate::naming::GroupNamer;
use crate::sink::GroupRequest;
use crate::taxonomy::{OTHERS, Taxonomy};

/// Options for [`Categorizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizeOptions {
    /// Minimum cosine similarity for a semantic match; clustering uses
    /// `1 - similarity_threshold` as its radius.
    pub similarity_threshold: f32,

    /// Smallest cluster that becomes its own group.
    pub min_cluster_size: usize,

    /// Members of each bucket compared against during semantic matching.
    pub representatives: usize,

    /// Characters of item text sent for embedding.
    pub max_text_chars: usize,

    /// Texts per embedding request.
    pub batch_size: usize,

    /// Wall-clock budget for embedding, in milliseconds.
    pub embedding_budget_ms: Option<u64>,
}

impl Default for CategorizeOptions {
    fn default() -> Self {
        Self {
            similarity_threshold: 0.7,
            min_cluster_size: 2,
            representatives: 3,
            max_text_chars: 500,
            batch_size: 4,
            embedding_budget_ms: None,
        }
    }
}

impl CategorizeOptions {
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_min_cluster_size(mut self, size: usize) -> Self {
        self.min_cluster_size = size;
        self
    }

    pub fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    pub fn with_embedding_budget(mut self, budget: Duration) -> Self {
        self.embedding_budget_ms = Some(budget.as_millis().try_into().unwrap_or(u64::MAX));
        self
    }

    pub fn embedding_budget(&self) -> Option<Duration> {
        self.embedding_budget_ms.map(Duration::from_millis)
    }
}

/// Which phase first placed items in a group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupOrigin {
    Domain,
    Semantic,
    Keyword,
    Cluster,
}

/// A named group produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    /// `group-N`, numbered in creation order.
    pub id: String,
    pub name: String,
    pub color: GroupColor,
    pub items: Vec<Item>,
    pub item_ids: Vec<ItemId>,
    pub origin: GroupOrigin,
}

impl CategoryGroup {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_request(&self) -> GroupRequest {
        GroupRequest::new(&self.name, self.color, self.item_ids.clone())
    }
}

/// Output of a categorization run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Categorization {
    /// Non-empty groups, largest first.
    pub groups: Vec<CategoryGroup>,

    /// Items no phase could place.
    pub others: Vec<Item>,
}

impl Categorization {
    /// Number of items across groups and Others.
    pub fn len(&self) -> usize {
        self.groups.iter().map(CategoryGroup::len).sum::<usize>() + self.others.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sink requests for every group, plus a collapsed grey Others group
    /// when it has members.
    pub fn requests(&self) -> Vec<GroupRequest> {
        let mut requests: Vec<GroupRequest> =
            self.groups.iter().map(CategoryGroup::to_request).collect();

        if !self.others.is_empty() {
            requests.push(
                GroupRequest::new(
                    OTHERS,
                    GroupColor::Grey,
                    self.others.iter().map(|item| item.id).collect(),
                )
                .collapsed(true),
            );
        }

        requests
    }
}

#[derive(Debug)]
struct Bucket {
    /// Fixed for taxonomy buckets; picked at output time for dynamic ones.
    color: Option<GroupColor>,
    /// How the first item got here; `None` until the bucket is filled.
    origin: Option<GroupOrigin>,
    items: Vec<Item>,
}

impl Bucket {
    fn new(color: Option<GroupColor>) -> Self {
        Self {
            color,
            origin: None,
            items: Vec::new(),
        }
    }

    fn add(&mut self, item: Item, origin: GroupOrigin) {
        self.origin.get_or_insert(origin);
        self.items.push(item);
    }
}

/// Runs the hybrid pipeline against a taxonomy.
#[derive(Debug, Clone)]
pub struct Categorizer<'t> {
    options: CategorizeOptions,
    taxonomy: &'t Taxonomy,
    namer: GroupNamer,
    color_seed: Option<u64>,
}

impl Categorizer<'static> {
    /// Create a categorizer over the built-in taxonomy.
    pub fn new(options: CategorizeOptions) -> Self {
        Self {
            options,
            taxonomy: Taxonomy::builtin(),
            namer: GroupNamer::new(),
            color_seed: None,
        }
    }
}

impl<'t> Categorizer<'t> {
    /// Use a different taxonomy.
    pub fn with_taxonomy<'a>(self, taxonomy: &'a Taxonomy) -> Categorizer<'a> {
        Categorizer {
            options: self.options,
            taxonomy,
            namer: self.namer,
            color_seed: self.color_seed,
        }
    }

    /// Fix the seed used to color dynamic groups.
    pub fn with_color_seed(mut self, seed: u64) -> Self {
        self.color_seed = Some(seed);
        self
    }

    /// Options this categorizer runs with.
    pub fn options(&self) -> &CategorizeOptions {
        &self.options
    }

    /// Categorize `items`, embedding through `provider` when one is given.
    ///
    /// Every input item appears exactly once in the output, either in a
    /// group or in Others. Only caller errors, such as two items sharing an
    /// id, are returned as `Err`.
    pub async fn categorize(
        &self,
        items: Vec<Item>,
        provider: Option<&dyn EmbeddingProvider>,
    ) -> Result<Categorization> {
        ensure_unique_ids(&items)?;
        info!(items = items.len(), "starting categorization");

        let mut buckets: IndexMap<String, Bucket> = self
            .taxonomy
            .categories()
            .iter()
            .filter(|spec| spec.name != OTHERS)
            .map(|spec| (spec.name.clone(), Bucket::new(Some(spec.color))))
            .collect();
        let mut others: Vec<Item> = Vec::new();

        // Phase 1: domain lookup
        let mut uncategorized = Vec::new();
        for item in items {
            match self
                .taxonomy
                .resolve(&item.url)
                .and_then(|category| buckets.get_mut(category))
            {
                Some(bucket) => bucket.add(item, GroupOrigin::Domain),
                None => uncategorized.push(item),
            }
        }
        info!(uncategorized = uncategorized.len(), "domain lookup complete");

        match provider {
            Some(provider) => {
                if !uncategorized.is_empty() {
                    let leftover = self
                        .semantic_phases(provider, &mut buckets, uncategorized)
                        .await?;
                    others.extend(leftover);
                }
            }
            None => {
                // Phase 4: keyword fallback
                for item in uncategorized {
                    let text = format!("{} {}", item.title, item.content);
                    match self
                        .taxonomy
                        .keyword_match(&text)
                        .and_then(|category| buckets.get_mut(category))
                    {
                        Some(bucket) => bucket.add(item, GroupOrigin::Keyword),
                        None => others.push(item),
                    }
                }
            }
        }

        let groups = self.finish(buckets);
        info!(
            groups = groups.len(),
            others = others.len(),
            "categorization complete"
        );

        Ok(Categorization { groups, others })
    }

    /// Phases 2 and 3. Returns the items bound for Others.
    async fn semantic_phases(
        &self,
        provider: &dyn EmbeddingProvider,
        buckets: &mut IndexMap<String, Bucket>,
        uncategorized: Vec<Item>,
    ) -> Result<Vec<Item>> {
        let reps = self.options.representatives;
        let max_chars = self.options.max_text_chars;

        // Representatives first, then the items to place.
        let mut texts: Vec<(ItemId, String)> = buckets
            .values()
            .flat_map(|bucket| bucket.items.iter().take(reps))
            .map(|item| (item.id, item.embedding_text(max_chars)))
            .collect();
        texts.extend(
            uncategorized
                .iter()
                .map(|item| (item.id, item.embedding_text(max_chars))),
        );

        let embedded = embed_in_batches(
            provider,
            texts,
            self.options.batch_size,
            self.options.embedding_budget(),
        )
        .await;

        if embedded.all_failed() {
            warn!(
                provider = provider.name(),
                items = uncategorized.len(),
                "every embedding batch failed; semantic phases skipped"
            );
            return Ok(uncategorized);
        }
        let vectors = &embedded.vectors;

        // Phase 2: semantic match against existing buckets
        let threshold = self.options.similarity_threshold;
        let mut others = Vec::new();
        let mut remaining = Vec::new();
        let mut matched = 0usize;

        for item in uncategorized {
            let Some(query) = vectors.get(&item.id) else {
                debug!(id = item.id, "no embedding; sending to Others");
                others.push(item);
                continue;
            };

            let best = {
                let candidates = buckets
                    .iter()
                    .filter(|(_, bucket)| !bucket.items.is_empty())
                    .flat_map(|(name, bucket)| {
                        bucket.items.iter().take(reps).filter_map(move |rep| {
                            vectors
                                .get(&rep.id)
                                .map(|v| (name.as_str(), v.as_slice()))
                        })
                    });
                find_top_k(query, candidates, 1, threshold)?
                    .into_iter()
                    .next()
            };

            match best.and_then(|hit| buckets.get_mut(&hit.id)) {
                Some(bucket) => {
                    matched += 1;
                    bucket.add(item, GroupOrigin::Semantic);
                }
                None => remaining.push(item),
            }
        }
        info!(matched, remaining = remaining.len(), "semantic matching complete");

        // Phase 3: cluster what is left
        let min_size = self.options.min_cluster_size;
        if remaining.len() < min_size {
            others.extend(remaining);
            return Ok(others);
        }

        let embeddings: IndexMap<ItemId, Embedding> = remaining
            .iter()
            .filter_map(|item| vectors.get(&item.id).map(|v| (item.id, v.clone())))
            .collect();
        let epsilon = (1.0 - threshold).clamp(0.0, MAX_EPSILON);
        let min_points = min_size.saturating_sub(1).max(1);

        let (clusters, leftover) = Dbscan::new(epsilon, min_points)
            .cluster(&embeddings)?
            .split_by_min_size(min_size);

        let mut by_id: HashMap<ItemId, Item> =
            remaining.into_iter().map(|item| (item.id, item)).collect();

        for members in clusters {
            let items: Vec<Item> = members.iter().filter_map(|id| by_id.remove(id)).collect();
            let name = self.namer.name(&items);
            self.add_cluster(buckets, &mut others, name, items);
        }
        others.extend(leftover.iter().filter_map(|id| by_id.remove(id)));

        Ok(others)
    }

    /// Place a phase-3 cluster: merge into a taxonomy bucket of the same
    /// name, or open a new bucket under a unique name.
    fn add_cluster(
        &self,
        buckets: &mut IndexMap<String, Bucket>,
        others: &mut Vec<Item>,
        name: String,
        items: Vec<Item>,
    ) {
        if name == OTHERS {
            others.extend(items);
            return;
        }

        if self.taxonomy.is_category(&name)
            && let Some(bucket) = buckets.get_mut(&name)
        {
            debug!(%name, size = items.len(), "merging cluster into category");
            for item in items {
                bucket.add(item, GroupOrigin::Cluster);
            }
            return;
        }

        let mut unique = name.clone();
        let mut suffix = 2;
        while buckets.contains_key(&unique) {
            unique = format!("{name} {suffix}");
            suffix += 1;
        }

        debug!(name = %unique, size = items.len(), "new cluster group");
        let mut bucket = Bucket::new(None);
        for item in items {
            bucket.add(item, GroupOrigin::Cluster);
        }
        buckets.insert(unique, bucket);
    }

    /// Emit non-empty buckets as groups, largest first.
    fn finish(&self, buckets: IndexMap<String, Bucket>) -> Vec<CategoryGroup> {
        let mut picker = match self.color_seed {
            Some(seed) => ColorPicker::seeded(seed),
            None => ColorPicker::new(),
        };
        for color in buckets
            .values()
            .filter(|bucket| !bucket.items.is_empty())
            .filter_map(|bucket| bucket.color)
        {
            picker.mark_used(color);
        }

        let mut groups: Vec<CategoryGroup> = Vec::new();
        for (name, bucket) in buckets {
            let Some(origin) = bucket.origin else {
                continue;
            };
            let color = bucket.color.unwrap_or_else(|| picker.pick());
            groups.push(CategoryGroup {
                id: format!("group-{}", groups.len()),
                name,
                color,
                item_ids: bucket.items.iter().map(|item| item.id).collect(),
                items: bucket.items,
                origin,
            });
        }

        // Stable: equal sizes keep creation order
        groups.sort_by_key(|group| Reverse(group.items.len()));
        groups
    }
}

/// Categorize `items` over the built-in taxonomy.
pub async fn categorize(
    items: Vec<Item>,
    options: &CategorizeOptions,
    provider: Option<&dyn EmbeddingProvider>,
) -> Result<Categorization> {
    Categorizer::new(options.clone())
        .categorize(items, provider)
        .await
}
