//! Human-readable names for dynamically formed groups.

use std::collections::HashSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex_lite::Regex;

use crate::item::Item;
use crate::keywords::NAMING_STOP_WORDS;

const MIN_NAME_LEN: usize = 3;

static TITLE_WORD: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"\b[a-z0-9]+\b").ok());

/// Derives a title for a group of items.
///
/// Tried in order:
/// 1. the category label every member shares,
/// 2. a site name (second-to-last host label) covering at least half the
///    members,
/// 3. the keyword maximizing `members containing it × sqrt(len)`,
/// 4. `Group <n>` with `n` taken from the clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupNamer;

impl GroupNamer {
    pub fn new() -> Self {
        Self
    }

    pub fn name(&self, items: &[Item]) -> String {
        shared_category(items)
            .or_else(|| dominant_site(items))
            .or_else(|| top_keyword(items))
            .unwrap_or_else(fallback_name)
    }
}

fn shared_category(items: &[Item]) -> Option<String> {
    let first = items.first()?.category.as_ref()?;
    items
        .iter()
        .all(|item| item.category.as_ref() == Some(first))
        .then(|| first.clone())
}

fn dominant_site(items: &[Item]) -> Option<String> {
    let mut counts: IndexMap<&str, usize> = IndexMap::new();

    for item in items {
        if item.domain.is_empty() {
            continue;
        }
        let labels: Vec<&str> = item.domain.split('.').collect();
        let site = if labels.len() >= 2 {
            labels[labels.len() - 2]
        } else {
            item.domain.as_str()
        };

        if site.len() >= MIN_NAME_LEN && !NAMING_STOP_WORDS.contains(site.to_lowercase().as_str())
        {
            *counts.entry(site).or_insert(0) += 1;
        }
    }

    let majority = items.len().div_ceil(2);
    counts
        .into_iter()
        .find(|(_, count)| *count >= majority)
        .map(|(site, _)| capitalize(site))
}

fn top_keyword(items: &[Item]) -> Option<String> {
    // word -> number of distinct members containing it
    let mut spread: IndexMap<String, usize> = IndexMap::new();

    for item in items {
        let mut words = candidate_words(item);
        let mut seen = HashSet::new();
        words.retain(|word| seen.insert(word.clone()));

        for word in words {
            *spread.entry(word).or_insert(0) += 1;
        }
    }

    let mut best: Option<(&str, f64)> = None;
    for (word, members) in &spread {
        let score = *members as f64 * (word.len() as f64).sqrt();
        if best.is_none_or(|(_, best_score)| score > best_score) {
            best = Some((word.as_str(), score));
        }
    }

    best.map(|(word, _)| capitalize(word))
}

/// Precomputed keywords when present, otherwise words from the title.
fn candidate_words(item: &Item) -> Vec<String> {
    if !item.keywords.is_empty() {
        return item
            .keywords
            .iter()
            .filter(|word| is_candidate(word))
            .cloned()
            .collect();
    }

    let title = item.title.to_lowercase();
    match TITLE_WORD.as_ref() {
        Some(re) => re
            .find_iter(&title)
            .map(|m| m.as_str())
            .filter(|word| is_candidate(word))
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

fn is_candidate(word: &str) -> bool {
    word.len() >= MIN_NAME_LEN && !NAMING_STOP_WORDS.contains(word)
}

fn fallback_name() -> String {
    let millis = chrono::Utc::now().timestamp_millis().rem_euclid(1000);
    format!("Group {millis}")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
