//! Window organization through a mock provider and a recording sink.

mod common;

use pretty_assertions::assert_eq;
use taborg_categorize::{
    CategorizeError, GroupColor, Item, OrganizeOptions, Organizer, RecordingSink, realize,
};

use common::{FailingProvider, RuleProvider, topic_rules};

fn window() -> Vec<Item> {
    vec![
        Item::from_tab(1, "Rust compiler repo", "https://github.com/rust-lang/rust"),
        Item::from_tab(2, "Sourdough starter", "https://ab.xyz/1"),
        Item::from_tab(3, "Borrow checker deep dive", "https://unknown1.xyz/post"),
        Item::from_tab(4, "Sourdough bread", "https://cd.xyz/2"),
        Item::from_tab(5, "Sourdough scoring", "https://ef.xyz/3"),
        Item::from_tab(6, "Tax forms", "https://gh.xyz/4"),
    ]
}

#[tokio::test]
async fn test_organize_window() {
    let provider = RuleProvider::new(topic_rules());
    let plan = Organizer::new(OrganizeOptions::default())
        .with_color_seed(1)
        .organize(&window(), &provider)
        .await
        .unwrap();

    let titles: Vec<&str> = plan.groups.iter().map(|g| g.title.as_str()).collect();
    assert_eq!(titles, vec!["Development", "Sourdough (s)", "Ungrouped"]);
    assert_eq!(plan.groups[0].item_ids, vec![1]);
    assert_eq!(plan.groups[1].item_ids, vec![2, 4, 5]);
    assert_eq!(plan.groups[2].item_ids, vec![3, 6]);
    assert_eq!(plan.groups[2].color, GroupColor::Grey);
    assert_eq!(plan.epsilon, Some(0.3));

    let sink = RecordingSink::new();
    assert_eq!(realize(&plan.groups, &sink).await, 3);
    assert!(sink.requests().await[2].collapsed);
}

#[tokio::test]
async fn test_custom_suffix() {
    let provider = RuleProvider::new(topic_rules());
    let plan = Organizer::new(OrganizeOptions::default().with_semantic_suffix(""))
        .organize(&window(), &provider)
        .await
        .unwrap();

    assert_eq!(plan.groups[1].title, "Sourdough");
}

#[tokio::test]
async fn test_failed_embeddings_leave_everything_ungrouped() {
    let plan = Organizer::new(OrganizeOptions::default())
        .organize(&window(), &FailingProvider)
        .await
        .unwrap();

    assert_eq!(plan.category_groups, 0);
    assert_eq!(plan.semantic_groups, 0);
    assert_eq!(plan.ungrouped, 6);
    assert_eq!(plan.groups.len(), 1);
    assert_eq!(plan.groups[0].item_ids, vec![1, 2, 3, 4, 5, 6]);
}

#[tokio::test]
async fn test_duplicate_ids_are_rejected() {
    let provider = RuleProvider::new(topic_rules());
    let mut items = window();
    items.push(Item::from_tab(4, "Sourdough bread again", "https://cd.xyz/5"));

    let err = Organizer::new(OrganizeOptions::default())
        .organize(&items, &provider)
        .await
        .unwrap_err();
    assert!(matches!(err, CategorizeError::DuplicateItemId(4)));
}
