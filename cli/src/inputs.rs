//! JSON inputs read by the CLI.

use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use taborg_categorize::Item;
use taborg_embeddings::Embedding;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Read an array of `{id, title, url, ...}` records, deriving domain and
/// keywords where they are missing.
pub fn read_items(path: &Path) -> Result<Vec<Item>> {
    let items: Vec<Item> = read_json(path)?;
    Ok(items.into_iter().map(Item::with_derived_fields).collect())
}

/// Read an object mapping ids to vectors, keeping file order.
pub fn read_embeddings<K>(path: &Path) -> Result<IndexMap<K, Embedding>>
where
    K: DeserializeOwned + Eq + std::hash::Hash,
{
    read_json(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_read_items_derives_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tabs.json");
        std::fs::write(
            &path,
            r#"[{"id": 7, "title": "Rust tutorial", "url": "https://www.docs.rs/serde"}]"#,
        )
        .unwrap();

        let items = read_items(&path).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].domain, "docs.rs");
        assert_eq!(items[0].keywords, vec!["rust", "tutorial"]);
    }

    #[test]
    fn test_read_embeddings_keeps_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("embeddings.json");
        std::fs::write(&path, r#"{"b": [1.0, 0.0], "a": [0.0, 1.0]}"#).unwrap();

        let embeddings: IndexMap<String, Embedding> = read_embeddings(&path).unwrap();
        let keys: Vec<&str> = embeddings.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_numeric_keys() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("embeddings.json");
        std::fs::write(&path, r#"{"3": [1.0], "1": [0.5]}"#).unwrap();

        let embeddings: IndexMap<u64, Embedding> = read_embeddings(&path).unwrap();
        assert_eq!(embeddings.keys().copied().collect::<Vec<_>>(), vec![3, 1]);
    }

    #[test]
    fn test_invalid_json_names_the_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tabs.json");
        std::fs::write(&path, "[{").unwrap();

        let err = read_items(&path).unwrap_err();
        assert!(format!("{err:#}").contains("tabs.json"));
    }
}
