//! End-to-end tests for the hybrid categorization pipeline.

mod common;

use std::collections::HashSet;
use std::time::Duration;

use pretty_assertions::assert_eq;
use taborg_categorize::{
    Categorization, CategorizeError, CategorizeOptions, Categorizer, GroupOrigin, Item, ItemId,
    PatternStore, RecordingSink, categorize, realize,
};

use common::{FailingProvider, RuleProvider, topic_rules};

fn tab(id: ItemId, title: &str, url: &str) -> Item {
    Item::from_tab(id, title, url)
}

fn mixed_window() -> Vec<Item> {
    vec![
        tab(1, "Rust compiler repo", "https://github.com/rust-lang/rust"),
        tab(2, "Borrow checker deep dive", "https://unknown1.xyz/post"),
        tab(3, "Sourdough starter", "https://ab.xyz/1"),
        tab(4, "Sourdough bread", "https://cd.xyz/2"),
        tab(5, "Sourdough scoring", "https://ef.xyz/3"),
        tab(6, "Tax forms", "https://gh.xyz/4"),
    ]
}

/// Every input id appears exactly once across groups and Others.
fn assert_partition(result: &Categorization, expected: &[ItemId]) {
    let mut seen: Vec<ItemId> = result
        .groups
        .iter()
        .flat_map(|group| group.item_ids.iter().copied())
        .chain(result.others.iter().map(|item| item.id))
        .collect();
    let unique: HashSet<ItemId> = seen.iter().copied().collect();
    assert_eq!(unique.len(), seen.len(), "an item was placed twice");

    seen.sort_unstable();
    let mut expected = expected.to_vec();
    expected.sort_unstable();
    assert_eq!(seen, expected);
}

#[tokio::test]
async fn test_domain_only_without_provider() {
    let items = vec![
        tab(1, "Issues", "https://github.com/a/b/issues"),
        tab(2, "Pulls", "https://github.com/a/b/pulls"),
        tab(3, "my personal blog post", "https://unknown.xyz"),
        tab(4, "Zzz", "https://random.abc/page"),
    ];

    let result = categorize(items, &CategorizeOptions::default(), None)
        .await
        .unwrap();

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].name, "Development");
    assert_eq!(result.groups[0].item_ids, vec![1, 2]);
    let others: Vec<ItemId> = result.others.iter().map(|item| item.id).collect();
    assert_eq!(others, vec![3, 4]);
    assert_partition(&result, &[1, 2, 3, 4]);
}

#[tokio::test]
async fn test_semantic_match_and_clustering() {
    let provider = RuleProvider::new(topic_rules());

    let result = Categorizer::new(CategorizeOptions::default())
        .with_color_seed(7)
        .categorize(mixed_window(), Some(&provider))
        .await
        .unwrap();

    let names: Vec<&str> = result.groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["Sourdough", "Development"]);

    let sourdough = &result.groups[0];
    assert_eq!(sourdough.item_ids, vec![3, 4, 5]);
    assert_eq!(sourdough.origin, GroupOrigin::Cluster);
    assert_eq!(sourdough.id, "group-1");

    let development = &result.groups[1];
    assert_eq!(development.item_ids, vec![1, 2]);
    assert_eq!(development.origin, GroupOrigin::Domain);
    assert_eq!(development.id, "group-0");

    let others: Vec<ItemId> = result.others.iter().map(|item| item.id).collect();
    assert_eq!(others, vec![6]);
    assert_partition(&result, &[1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_failing_provider_keeps_every_item() {
    let result = categorize(
        mixed_window(),
        &CategorizeOptions::default(),
        Some(&FailingProvider),
    )
    .await
    .unwrap();

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.groups[0].name, "Development");
    assert_eq!(result.others.len(), 5);
    assert_partition(&result, &[1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_embedding_budget_timeout_falls_back_to_others() {
    let provider = RuleProvider::new(topic_rules()).with_delay(Duration::from_millis(500));
    let options = CategorizeOptions::default().with_embedding_budget(Duration::from_millis(20));

    let result = categorize(mixed_window(), &options, Some(&provider))
        .await
        .unwrap();

    assert_eq!(result.groups.len(), 1);
    assert_eq!(result.others.len(), 5);
    assert_partition(&result, &[1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_repeated_runs_agree() {
    let provider = RuleProvider::new(topic_rules());
    let categorizer = Categorizer::new(CategorizeOptions::default()).with_color_seed(42);

    let first = categorizer
        .categorize(mixed_window(), Some(&provider))
        .await
        .unwrap();
    let second = categorizer
        .categorize(mixed_window(), Some(&provider))
        .await
        .unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_realize_and_record_patterns() {
    let provider = RuleProvider::new(topic_rules());
    let result = categorize(mixed_window(), &CategorizeOptions::default(), Some(&provider))
        .await
        .unwrap();

    let sink = RecordingSink::new();
    let created = realize(&result.requests(), &sink).await;
    assert_eq!(created, 3);

    let requests = sink.requests().await;
    assert_eq!(requests[2].title, "Others");
    assert!(requests[2].collapsed);

    let dir = tempfile::TempDir::new().unwrap();
    let store = PatternStore::open(dir.path().join("patterns.json"), 10);
    assert_eq!(store.record(&result.groups).await.unwrap(), 2);

    let patterns = store.load().await;
    assert_eq!(patterns[0].name, "Sourdough");
    assert!(patterns[0].keywords.contains(&"sourdough".to_string()));
}

#[tokio::test]
async fn test_duplicate_ids_are_rejected() {
    let provider = RuleProvider::new(topic_rules());
    let items = vec![
        tab(7, "Sourdough starter", "https://ab.xyz/1"),
        tab(7, "Sourdough bread", "https://cd.xyz/2"),
        tab(8, "Sourdough scoring", "https://ef.xyz/3"),
    ];

    let err = categorize(items, &CategorizeOptions::default(), Some(&provider))
        .await
        .unwrap_err();
    assert!(matches!(err, CategorizeError::DuplicateItemId(7)));
}
