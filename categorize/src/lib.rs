//! # Categorize
//!
//! Hybrid categorization of browser tabs into named, colored groups.
//!
//! ## Features
//!
//! - **Domain table**: URLs resolve to a fixed taxonomy by host, path prefix
//!   or base domain
//! - **Semantic matching**: leftover tabs join the taxonomy group whose
//!   representatives they most resemble
//! - **Clustering**: what is still left is grouped by density and named from
//!   shared sites or keywords
//! - **Organizer**: a domain-first plan for a whole window, with a collapsed
//!   ungrouped bucket
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       Categorizer                               │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  items ──► resolver ──► taxonomy buckets                        │
//! │              │                                                  │
//! │              ▼ (uncategorized)                                  │
//! │   provider? ─┬─ yes ──► semantic match ──► DBSCAN ──► namer     │
//! │              └─ no  ──► keyword match                           │
//! │                                                                 │
//! │  Categorization ──► GroupRequest ──► GroupSink                  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every input item ends up in exactly one group or in `Others`, whatever
//! the embedding provider does.

pub mod color;
mod embed;
pub mod error;
pub mod item;
pub mod keywords;
pub mod naming;
pub mod organizer;
pub mod patterns;
pub mod pipeline;
pub mod resolver;
pub mod sink;
pub mod taxonomy;

pub use color::{ColorPicker, GroupColor};
pub use error::{CategorizeError, Result};
pub use item::{Item, ItemId};
pub use keywords::{detect_category, extract_keywords};
pub use naming::GroupNamer;
pub use organizer::{OrganizeOptions, OrganizePlan, Organizer};
pub use patterns::{DEFAULT_MAX_PATTERNS, GroupingPattern, PatternStore};
pub use pipeline::{
    Categorization, CategorizeOptions, CategoryGroup, Categorizer, GroupOrigin, categorize,
};
pub use resolver::{HostPath, keyword_match, resolve_category};
pub use sink::{GroupRequest, GroupSink, RecordingSink, realize};
pub use taxonomy::{CategorySpec, OTHERS, Taxonomy};
