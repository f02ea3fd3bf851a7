//! Keyword extraction from tab titles and page content.

use std::cmp::Reverse;
use std::collections::HashSet;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// Maximum number of keywords kept per item.
pub const MAX_KEYWORDS: usize = 15;

const MIN_WORD_LEN: usize = 3;
const MAX_WORD_LEN: usize = 19;

/// Words that carry no topical signal in titles and page snippets.
pub static KEYWORD_STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "is", "it", "this", "that", "from", "as", "are", "was", "were", "be", "been", "has",
        "have", "had", "do", "does", "did", "will", "would", "could", "should", "may", "might",
        "can", "your", "my", "our", "their", "his", "her", "its", "new", "all", "one", "two",
        "three", "http", "https", "www", "com", "org", "net", "io", "app", "web", "html",
        "untitled", "home", "page", "index", "about", "null", "undefined", "google", "chrome",
        "tab", "browser", "window", "view", "open", "close", "save", "edit", "delete", "click",
        "here", "more", "less", "back", "next", "first", "last", "login", "logout", "sign",
        "register", "account", "settings", "help", "just", "get", "see", "also", "use", "make",
        "know", "want", "need", "like", "way", "well", "after", "think",
    ]
    .into_iter()
    .collect()
});

/// Words skipped when naming a group: generic title filler plus browser and
/// search terms that show up in every window.
pub static NAMING_STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
        "from", "as", "is", "was", "are", "been", "be", "www", "com", "net", "org", "http",
        "https", "html", "htm", "google", "search", "chrome", "browser", "tab", "new", "page",
        "home", "web", "site", "online", "free", "best", "top", "how", "what", "why", "brave",
        "firefox", "safari", "edge", "extensions",
    ]
    .into_iter()
    .collect()
});

/// Extract up to [`MAX_KEYWORDS`] keywords from a title and optional content.
///
/// Text is lowercased and everything outside `[a-z0-9]` and whitespace
/// becomes a separator. Words of 3 to 19 characters that are not stop words
/// are counted; the most frequent come first, ties in order of first
/// appearance.
pub fn extract_keywords(title: &str, content: &str) -> Vec<String> {
    let text: String = format!("{title} {content}")
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    let mut counts: IndexMap<&str, usize> = IndexMap::new();
    for word in text.split_whitespace() {
        if (MIN_WORD_LEN..=MAX_WORD_LEN).contains(&word.len())
            && !KEYWORD_STOP_WORDS.contains(word)
        {
            *counts.entry(word).or_insert(0) += 1;
        }
    }

    // Stable sort keeps first-appearance order among equal counts
    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by_key(|(_, count)| Reverse(*count));

    ranked
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(word, _)| word.to_string())
        .collect()
}

/// Title and content keywords per category label, in priority order.
#[rustfmt::skip]
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    ("Documents", &["document", "spreadsheet", "presentation", "sheet", "slides", "word", "excel", "pdf"]),
    ("Design", &["figma", "design", "canva", "sketch", "adobe", "prototype", "mockup", "wireframe"]),
    ("Research", &["research", "study", "paper", "journal", "analysis", "thesis", "academic"]),
    ("Communication", &["chat", "message", "meeting", "calendar", "zoom", "teams", "conference"]),
    ("Reading", &["article", "blog", "post", "story", "guide", "tutorial", "news"]),
    ("Shopping", &["cart", "checkout", "shop", "buy", "price", "product", "order", "sale"]),
    ("Development", &["pull request", "issue", "commit", "code", "repository", "debug", "api", "developer", "javascript", "python", "react"]),
    ("Email", &["inbox", "compose", "draft", "sent", "email", "mail"]),
    ("Video", &["watch", "video", "episode", "movie", "stream", "subscribe"]),
    ("Music", &["playlist", "album", "song", "artist", "music", "spotify"]),
    ("Finance", &["balance", "transaction", "payment", "invoice", "bank", "credit"]),
    ("AI", &["chatgpt", "claude", "ai", "prompt", "assistant", "copilot", "gemini", "llm"]),
    ("Social", &["feed", "timeline", "profile", "followers", "post", "comment", "share"]),
    ("Learning", &["course", "lesson", "learn", "education", "training", "certification"]),
];

/// URL fragments checked when no keyword category scores high enough.
#[rustfmt::skip]
const CATEGORY_URLS: &[(&str, &[&str])] = &[
    ("Development", &["github.com", "gitlab.com", "stackoverflow.com", "localhost"]),
    ("Social", &["facebook.com", "twitter.com", "x.com", "instagram.com", "linkedin.com", "reddit.com"]),
    ("Video", &["youtube.com", "netflix.com", "twitch.tv"]),
    ("Email", &["mail.google.com", "outlook."]),
    ("Documents", &["docs.google.com", "sheets.google.com", "slides.google.com"]),
    ("AI", &["chat.openai.com", "claude.ai"]),
    ("Shopping", &["amazon.com", "ebay.com"]),
];

const TITLE_WEIGHT: usize = 3;
const CONTENT_WEIGHT: usize = 1;
const MIN_CATEGORY_SCORE: usize = 2;

/// Guess a coarse category label for a tab.
///
/// Each keyword found in the title scores 3, or 1 if only the content has
/// it. The best category wins when it reaches 2; earlier categories win
/// ties. Otherwise the URL is matched against well-known sites. Matching is
/// by substring, so `"ai"` also hits `"email"`.
pub fn detect_category(title: &str, url: &str, content: &str) -> Option<&'static str> {
    let title = title.to_lowercase();
    let content = content.to_lowercase();

    let mut best: Option<(&'static str, usize)> = None;
    for (category, keywords) in CATEGORY_KEYWORDS {
        let score: usize = keywords
            .iter()
            .map(|keyword| {
                if title.contains(keyword) {
                    TITLE_WEIGHT
                } else if content.contains(keyword) {
                    CONTENT_WEIGHT
                } else {
                    0
                }
            })
            .sum();
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((*category, score));
        }
    }
    if let Some((category, _)) = best.filter(|(_, score)| *score >= MIN_CATEGORY_SCORE) {
        return Some(category);
    }

    let url = url.to_lowercase();
    CATEGORY_URLS
        .iter()
        .find(|(_, fragments)| fragments.iter().any(|fragment| url.contains(fragment)))
        .map(|(category, _)| *category)
}
