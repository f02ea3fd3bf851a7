//! Domain-first organization of a whole window.
//!
//! Every embedded item that resolves to a taxonomy category joins that
//! category's group, however small. The rest are clustered with a tight
//! radius; clusters become semantic groups and everything left over lands in
//! one collapsed grey group.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use taborg_cluster::{Dbscan, suggest_epsilon};
use taborg_embeddings::{Embedding, EmbeddingProvider};
use tracing::{debug, info};

use crate::color::{ColorPicker, GroupColor};
use crate::embed::embed_in_batches;
use crate::error::Result;
use crate::item::{Item, ItemId, ensure_unique_ids};
use crate::naming::GroupNamer;
use crate::sink::GroupRequest;
use crate::taxonomy::Taxonomy;

/// Options for [`Organizer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizeOptions {
    /// Upper bound on the clustering radius.
    pub epsilon_cap: f32,

    /// Radius used when too few items remain to estimate one.
    pub small_remainder_epsilon: f32,

    /// Estimate the radius only above this many remaining items.
    pub suggest_above: usize,

    pub min_points: usize,

    /// Smallest cluster that becomes a semantic group.
    pub min_group_size: usize,

    /// Neighbor rank for radius estimation.
    pub k: usize,

    /// Texts per embedding request.
    pub batch_size: usize,

    /// Appended to semantic group titles.
    pub semantic_suffix: String,

    pub ungrouped_title: String,
}

impl Default for OrganizeOptions {
    fn default() -> Self {
        Self {
            epsilon_cap: 0.35,
            small_remainder_epsilon: 0.3,
            suggest_above: 5,
            min_points: 2,
            min_group_size: 2,
            k: taborg_cluster::DEFAULT_K,
            batch_size: 4,
            semantic_suffix: " (s)".to_string(),
            ungrouped_title: "Ungrouped".to_string(),
        }
    }
}

impl OrganizeOptions {
    pub fn with_epsilon_cap(mut self, cap: f32) -> Self {
        self.epsilon_cap = cap;
        self
    }

    pub fn with_semantic_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.semantic_suffix = suffix.into();
        self
    }
}

/// Groups to create, with summary counts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrganizePlan {
    /// Category groups first, then semantic groups, then the ungrouped
    /// group if any.
    pub groups: Vec<GroupRequest>,
    pub category_groups: usize,
    pub semantic_groups: usize,
    /// Items in the ungrouped group.
    pub ungrouped: usize,
    /// Clustering radius used for the remainder, when clustering ran.
    pub epsilon: Option<f32>,
}

/// Plans tab groups for a window.
#[derive(Debug, Clone)]
pub struct Organizer<'t> {
    options: OrganizeOptions,
    taxonomy: &'t Taxonomy,
    namer: GroupNamer,
    color_seed: Option<u64>,
}

impl Organizer<'static> {
    pub fn new(options: OrganizeOptions) -> Self {
        Self {
            options,
            taxonomy: Taxonomy::builtin(),
            namer: GroupNamer::new(),
            color_seed: None,
        }
    }
}

impl<'t> Organizer<'t> {
    pub fn with_taxonomy<'a>(self, taxonomy: &'a Taxonomy) -> Organizer<'a> {
        Organizer {
            options: self.options,
            taxonomy,
            namer: self.namer,
            color_seed: self.color_seed,
        }
    }

    pub fn with_color_seed(mut self, seed: u64) -> Self {
        self.color_seed = Some(seed);
        self
    }

    /// Embed every item's `title url` text, then plan.
    ///
    /// Batches that fail are skipped; their items end up ungrouped.
    pub async fn organize(
        &self,
        items: &[Item],
        provider: &dyn EmbeddingProvider,
    ) -> Result<OrganizePlan> {
        ensure_unique_ids(items)?;
        let texts = items
            .iter()
            .map(|item| (item.id, item.organizer_text()))
            .collect();
        let mut embedded =
            embed_in_batches(provider, texts, self.options.batch_size, None).await;
        info!(
            items = items.len(),
            embedded = embedded.vectors.len(),
            "received embeddings"
        );

        let embeddings: IndexMap<ItemId, Embedding> = items
            .iter()
            .filter_map(|item| embedded.vectors.remove(&item.id).map(|v| (item.id, v)))
            .collect();

        self.plan(items, &embeddings)
    }

    /// Plan groups from precomputed embeddings.
    ///
    /// Items without an embedding are never categorized or clustered; they
    /// go straight to the ungrouped group. Fails when two items share an id.
    pub fn plan(
        &self,
        items: &[Item],
        embeddings: &IndexMap<ItemId, Embedding>,
    ) -> Result<OrganizePlan> {
        ensure_unique_ids(items)?;
        let mut picker = match self.color_seed {
            Some(seed) => ColorPicker::seeded(seed),
            None => ColorPicker::new(),
        };
        let mut plan = OrganizePlan::default();
        let mut grouped: HashSet<ItemId> = HashSet::new();

        // Category groups, in order of first appearance
        let mut categories: IndexMap<&str, Vec<ItemId>> = IndexMap::new();
        for item in items.iter().filter(|item| embeddings.contains_key(&item.id)) {
            if let Some(category) = self.taxonomy.resolve(&item.url) {
                debug!(id = item.id, category, "categorized by domain");
                categories.entry(category).or_default().push(item.id);
            }
        }

        for (category, ids) in categories {
            let color = self.taxonomy.color_of(category).unwrap_or(GroupColor::Grey);
            picker.mark_used(color);
            grouped.extend(ids.iter().copied());
            plan.groups.push(GroupRequest::new(category, color, ids));
            plan.category_groups += 1;
        }

        // Semantic clustering of what is left
        let remaining: IndexMap<ItemId, Embedding> = items
            .iter()
            .filter(|item| !grouped.contains(&item.id))
            .filter_map(|item| embeddings.get(&item.id).map(|v| (item.id, v.clone())))
            .collect();

        if remaining.len() >= 2 {
            let epsilon = self.epsilon_for(&remaining)?;
            plan.epsilon = Some(epsilon);
            info!(
                remaining = remaining.len(),
                epsilon,
                min_points = self.options.min_points,
                "clustering remaining items"
            );

            let (clusters, _) = Dbscan::new(epsilon, self.options.min_points)
                .cluster(&remaining)?
                .split_by_min_size(self.options.min_group_size);

            for ids in clusters {
                let members: Vec<Item> = items
                    .iter()
                    .filter(|item| ids.contains(&item.id))
                    .cloned()
                    .collect();
                let title = format!(
                    "{}{}",
                    self.namer.name(&members),
                    self.options.semantic_suffix
                );
                let color = picker.pick();

                grouped.extend(ids.iter().copied());
                plan.groups.push(GroupRequest::new(title, color, ids));
                plan.semantic_groups += 1;
            }
        }

        let ungrouped: Vec<ItemId> = items
            .iter()
            .map(|item| item.id)
            .filter(|id| !grouped.contains(id))
            .collect();
        if !ungrouped.is_empty() {
            plan.ungrouped = ungrouped.len();
            plan.groups.push(
                GroupRequest::new(&self.options.ungrouped_title, GroupColor::Grey, ungrouped)
                    .collapsed(true),
            );
        }

        info!(
            category_groups = plan.category_groups,
            semantic_groups = plan.semantic_groups,
            ungrouped = plan.ungrouped,
            "organize plan ready"
        );
        Ok(plan)
    }

    fn epsilon_for(&self, remaining: &IndexMap<ItemId, Embedding>) -> Result<f32> {
        let epsilon = if remaining.len() > self.options.suggest_above {
            suggest_epsilon(remaining, self.options.k)?
        } else {
            self.options.small_remainder_epsilon
        };
        Ok(epsilon.min(self.options.epsilon_cap))
    }
}
