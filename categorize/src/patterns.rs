//! Persisted record of groups the user has been shown.
//!
//! Each categorization run can append one pattern per group; the store keeps
//! only the newest entries.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::{debug, warn};

use crate::color::GroupColor;
use crate::error::Result;
use crate::pipeline::CategoryGroup;

/// Patterns kept on disk.
pub const DEFAULT_MAX_PATTERNS: usize = 50;

/// Keywords kept per pattern.
pub const MAX_PATTERN_KEYWORDS: usize = 20;

/// A named group and the keywords of its members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupingPattern {
    pub name: String,
    pub keywords: Vec<String>,
    pub color: GroupColor,
    pub recorded_at: DateTime<Utc>,
}

impl GroupingPattern {
    pub fn from_group(group: &CategoryGroup) -> Self {
        Self {
            name: group.name.clone(),
            keywords: group
                .items
                .iter()
                .flat_map(|item| item.keywords.iter().cloned())
                .take(MAX_PATTERN_KEYWORDS)
                .collect(),
            color: group.color,
            recorded_at: Utc::now(),
        }
    }
}

/// JSON file of recent [`GroupingPattern`]s.
#[derive(Debug, Clone)]
pub struct PatternStore {
    path: PathBuf,
    max_patterns: usize,
}

impl PatternStore {
    pub fn open(path: impl AsRef<Path>, max_patterns: usize) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            max_patterns,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stored patterns, oldest first.
    ///
    /// A missing or unreadable file yields an empty list.
    pub async fn load(&self) -> Vec<GroupingPattern> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "failed to read patterns");
                return Vec::new();
            }
        };

        match serde_json::from_str(&content) {
            Ok(patterns) => patterns,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "ignoring malformed patterns file");
                Vec::new()
            }
        }
    }

    /// Append a pattern per group and write the newest `max_patterns` back.
    ///
    /// Returns the number of patterns now stored.
    pub async fn record(&self, groups: &[CategoryGroup]) -> Result<usize> {
        let mut patterns = self.load().await;
        patterns.extend(groups.iter().map(GroupingPattern::from_group));

        let excess = patterns.len().saturating_sub(self.max_patterns);
        patterns.drain(..excess);

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(&patterns)?).await?;

        debug!(
            path = %self.path.display(),
            recorded = groups.len(),
            stored = patterns.len(),
            "saved grouping patterns"
        );
        Ok(patterns.len())
    }
}
