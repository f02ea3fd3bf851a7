//! Configuration for the `taborg` command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use taborg_categorize::{CategorizeOptions, DEFAULT_MAX_PATTERNS, OrganizeOptions};

/// Top-level configuration, usually read from `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Hybrid categorization options.
    pub categorize: CategorizeOptions,

    /// Window organizer options.
    pub organize: OrganizeOptions,

    /// Embedding provider configuration.
    pub embedding: EmbeddingConfig,

    /// Grouping pattern history.
    pub patterns: PatternsConfig,
}

impl Config {
    /// `<config_dir>/taborg/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("taborg").join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default path is used if
    /// present, otherwise built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path().filter(|path| path.exists()) {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

/// Configuration for the embedding provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// Which provider to use.
    pub provider: EmbeddingProviderType,

    /// Model to use for embeddings.
    pub model: Option<String>,

    /// Base URL of an OpenAI-compatible endpoint.
    pub base_url: Option<String>,

    /// Whether to cache embeddings.
    pub cache_enabled: bool,

    /// Maximum cache size.
    pub cache_max_entries: usize,

    /// Where to persist the cache; in memory only when unset.
    pub cache_path: Option<PathBuf>,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderType::OpenAI,
            model: None,
            base_url: None,
            cache_enabled: true,
            cache_max_entries: 10000,
            cache_path: None,
        }
    }
}

/// Type of embedding provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderType {
    /// OpenAI-compatible embeddings API.
    #[serde(rename = "openai")]
    #[value(name = "openai")]
    OpenAI,
    /// No embeddings (domain and keyword matching only).
    None,
}

/// Where grouping patterns are kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternsConfig {
    /// Record a pattern for every group a run produces.
    pub record: bool,

    pub path: PathBuf,

    pub max_patterns: usize,
}

impl Default for PatternsConfig {
    fn default() -> Self {
        Self {
            record: false,
            path: dirs::data_dir()
                .unwrap_or_default()
                .join("taborg/patterns.json"),
            max_patterns: DEFAULT_MAX_PATTERNS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections_override_defaults() {
        let config = Config::from_toml_str(
            r#"
            [categorize]
            similarity_threshold = 0.8
            embedding_budget_ms = 1500

            [organize]
            semantic_suffix = ""

            [embedding]
            provider = "none"
            cache_max_entries = 50

            [patterns]
            record = true
            max_patterns = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.categorize.similarity_threshold, 0.8);
        assert_eq!(config.categorize.min_cluster_size, 2);
        assert_eq!(config.categorize.embedding_budget_ms, Some(1500));
        assert_eq!(config.organize.semantic_suffix, "");
        assert_eq!(config.organize.epsilon_cap, 0.35);
        assert_eq!(config.embedding.provider, EmbeddingProviderType::None);
        assert_eq!(config.embedding.cache_max_entries, 50);
        assert!(config.embedding.cache_enabled);
        assert!(config.patterns.record);
        assert_eq!(config.patterns.max_patterns, 5);
    }

    #[test]
    fn test_openai_provider_name() {
        let config = Config::from_toml_str("[embedding]\nprovider = \"openai\"\n").unwrap();
        assert_eq!(config.embedding.provider, EmbeddingProviderType::OpenAI);
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[organize]\nepsilon_cap = 0.2\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.organize.epsilon_cap, 0.2);
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_malformed_config_is_an_error() {
        assert!(Config::from_toml_str("[categorize]\nsimilarity_threshold = \"high\"").is_err());
    }
}
