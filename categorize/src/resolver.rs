//! Category resolution by domain and by keyword.

use tracing::debug;
use url::Url;

use crate::taxonomy::{OTHERS, Taxonomy};

/// Minimum keyword score for a category to be assigned.
const MIN_KEYWORD_SCORE: usize = 2;

/// Keywords longer than this count double.
const STRONG_KEYWORD_LEN: usize = 5;

/// Parsed host and path of a tab URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPath {
    /// Hostname with a leading `www.` removed.
    pub host: String,
    pub path: String,
}

impl HostPath {
    /// Parse a URL; `None` when it is malformed or has no host.
    pub fn parse(url: &str) -> Option<Self> {
        let parsed = Url::parse(url).ok()?;
        let host = parsed.host_str()?;
        if host.is_empty() {
            return None;
        }
        let host = host.strip_prefix("www.").unwrap_or(host);

        Some(Self {
            host: host.to_string(),
            path: parsed.path().to_string(),
        })
    }

    /// Last two labels, when the host has more than two.
    pub fn base_domain(&self) -> Option<String> {
        let labels: Vec<&str> = self.host.split('.').collect();
        if labels.len() > 2 {
            Some(labels[labels.len() - 2..].join("."))
        } else {
            None
        }
    }
}

impl Taxonomy {
    /// Resolve a URL to a category through the domain table.
    ///
    /// Tries the exact hostname, then the first table entry that prefixes
    /// `host + path` or suffixes the host, then the base domain.
    pub fn resolve(&self, url: &str) -> Option<&str> {
        let parsed = HostPath::parse(url)?;
        let host = parsed.host.as_str();

        if let Some(category) = self.lookup_domain(host) {
            return Some(category);
        }

        let full_path = format!("{host}{}", parsed.path);
        if let Some((domain, category)) = self
            .domains()
            .find(|(domain, _)| full_path.starts_with(domain) || host.ends_with(domain))
        {
            debug!(%host, domain, category, "partial domain match");
            return Some(category);
        }

        let base = parsed.base_domain()?;
        self.lookup_domain(&base)
    }

    /// Score categories by the keywords found in `text`.
    ///
    /// Each contained keyword adds 2 when longer than five characters and 1
    /// otherwise. The best score wins when it reaches 2; ties go to the
    /// category declared first.
    pub fn keyword_match(&self, text: &str) -> Option<&str> {
        let text = text.to_lowercase();
        let mut best: Option<(&str, usize)> = None;

        for spec in self.categories() {
            if spec.name == OTHERS || spec.keywords.is_empty() {
                continue;
            }

            let score: usize = spec
                .keywords
                .iter()
                .filter(|keyword| text.contains(keyword.as_str()))
                .map(|keyword| {
                    if keyword.len() > STRONG_KEYWORD_LEN {
                        2
                    } else {
                        1
                    }
                })
                .sum();

            let best_score = best.map_or(0, |(_, s)| s);
            if score >= MIN_KEYWORD_SCORE && score > best_score {
                best = Some((spec.name.as_str(), score));
            }
        }

        best.map(|(name, _)| name)
    }
}

/// Resolve a URL against the built-in taxonomy.
pub fn resolve_category(url: &str) -> Option<&'static str> {
    Taxonomy::builtin().resolve(url)
}

/// Keyword-match text against the built-in taxonomy.
pub fn keyword_match(text: &str) -> Option<&'static str> {
    Taxonomy::builtin().keyword_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_resolve_exact_host() {
        assert_eq!(resolve_category("https://github.com/foo"), Some("Development"));
        assert_eq!(resolve_category("https://www.github.com/"), Some("Development"));
    }

    #[test]
    fn test_resolve_subdomain() {
        assert_eq!(
            resolve_category("https://app.slack.com/client"),
            Some("Communication")
        );
        assert_eq!(resolve_category("https://gist.github.com/x"), Some("Development"));
    }

    #[test]
    fn test_resolve_path_prefix() {
        assert_eq!(
            resolve_category("https://www.google.com/maps/place"),
            Some("Travel")
        );
    }

    #[test]
    fn test_resolve_unknown_and_malformed() {
        assert_eq!(resolve_category("https://unknown-zzz.example"), None);
        assert_eq!(resolve_category("not a url"), None);
        assert_eq!(resolve_category("about:blank"), None);
        assert_eq!(resolve_category(""), None);
    }

    #[test]
    fn test_host_path_parse() {
        let parsed = HostPath::parse("https://www.docs.rs/tokio/latest").unwrap();
        assert_eq!(parsed.host, "docs.rs");
        assert_eq!(parsed.path, "/tokio/latest");
        assert_eq!(parsed.base_domain(), None);

        let nested = HostPath::parse("https://mail.corp.example.com").unwrap();
        assert_eq!(nested.base_domain().as_deref(), Some("example.com"));
    }

    #[test]
    fn test_keyword_match_needs_two_points() {
        // "post" alone is a single short keyword.
        assert_eq!(keyword_match("my personal blog post"), None);
        assert_eq!(keyword_match("weather for tomorrow"), None);
    }

    #[test]
    fn test_keyword_match_long_keyword_counts_double() {
        assert_eq!(keyword_match("Intro tutorial"), Some("Learning"));
        assert_eq!(keyword_match("Checkout your cart"), Some("Shopping"));
    }

    #[test]
    fn test_keyword_match_tie_goes_to_earlier_category() {
        // "flight" (Travel) and "wallet" (Finance) both score 2.
        assert_eq!(keyword_match("flight wallet"), Some("Travel"));
    }
}
