//! Tab items fed to the categorizer.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CategorizeError, Result};
use crate::keywords::{detect_category, extract_keywords};
use crate::resolver::HostPath;

/// Identifier of an item, unique within one run.
pub type ItemId = u64;

/// A browser tab, or anything with a title and a URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub url: String,

    /// Hostname without a leading `www.`; empty when the URL is unparseable.
    #[serde(default)]
    pub domain: String,

    /// First host label when the host has more than two labels.
    #[serde(default)]
    pub subdomain: String,

    /// Free-text page snippet.
    #[serde(default)]
    pub content: String,

    #[serde(default)]
    pub keywords: Vec<String>,

    /// Precomputed category label, if any.
    #[serde(default)]
    pub category: Option<String>,
}

impl Item {
    /// Build an item from a tab's title and URL, deriving domain, subdomain,
    /// keywords and category.
    pub fn from_tab(id: ItemId, title: impl Into<String>, url: impl Into<String>) -> Self {
        let title = title.into();
        let url = url.into();

        let (domain, subdomain) = split_host(&url);

        let keywords = extract_keywords(&title, "");
        let category = detect_category(&title, &url, "").map(str::to_string);

        Self {
            id,
            title,
            url,
            domain,
            subdomain,
            content: String::new(),
            keywords,
            category,
        }
    }

    /// Attach a page snippet and re-derive keywords and category from it.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self.keywords = extract_keywords(&self.title, &self.content);
        self.category = detect_category(&self.title, &self.url, &self.content).map(str::to_string);
        self
    }

    /// Fill in domain, subdomain, keywords and category when they are
    /// missing, as for items deserialized from bare `{id, title, url}`
    /// records.
    pub fn with_derived_fields(mut self) -> Self {
        if self.domain.is_empty() {
            (self.domain, self.subdomain) = split_host(&self.url);
        }
        if self.keywords.is_empty() {
            self.keywords = extract_keywords(&self.title, &self.content);
        }
        if self.category.is_none() {
            self.category =
                detect_category(&self.title, &self.url, &self.content).map(str::to_string);
        }
        self
    }

    /// Attach a precomputed category label.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Text embedded by the categorization pipeline: title, domain and
    /// content, cut to `max_chars` characters.
    pub fn embedding_text(&self, max_chars: usize) -> String {
        format!("{} {} {}", self.title, self.domain, self.content)
            .chars()
            .take(max_chars)
            .collect()
    }

    /// Text embedded by the organizer: title and URL.
    pub fn organizer_text(&self) -> String {
        format!("{} {}", self.title, self.url)
    }
}

/// Reject inputs in which two items share an id.
pub(crate) fn ensure_unique_ids(items: &[Item]) -> Result<()> {
    let mut seen = HashSet::with_capacity(items.len());
    match items.iter().find(|item| !seen.insert(item.id)) {
        Some(item) => Err(CategorizeError::DuplicateItemId(item.id)),
        None => Ok(()),
    }
}

fn split_host(url: &str) -> (String, String) {
    let Some(parsed) = HostPath::parse(url) else {
        return (String::new(), String::new());
    };

    let labels: Vec<&str> = parsed.host.split('.').collect();
    let subdomain = if labels.len() > 2 {
        labels[0].to_string()
    } else {
        String::new()
    };
    (parsed.host, subdomain)
}
