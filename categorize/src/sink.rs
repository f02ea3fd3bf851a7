//! Realizing planned groups through an external sink.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::color::GroupColor;
use crate::error::Result;
use crate::item::ItemId;

/// A group to be created by a sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupRequest {
    pub title: String,
    pub color: GroupColor,
    pub item_ids: Vec<ItemId>,
    pub collapsed: bool,
}

impl GroupRequest {
    pub fn new(title: impl Into<String>, color: GroupColor, item_ids: Vec<ItemId>) -> Self {
        Self {
            title: title.into(),
            color,
            item_ids,
            collapsed: false,
        }
    }

    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }
}

/// Something that can turn a [`GroupRequest`] into a real group, such as a
/// browser's tab-group API.
#[async_trait]
pub trait GroupSink: Send + Sync {
    async fn create_group(&self, request: &GroupRequest) -> Result<()>;
}

/// Send every request to the sink in order.
///
/// A failed request is logged and skipped; the rest still go out. Returns
/// the number of groups created.
pub async fn realize(groups: &[GroupRequest], sink: &dyn GroupSink) -> usize {
    let mut created = 0;

    for request in groups {
        match sink.create_group(request).await {
            Ok(()) => {
                debug!(title = %request.title, size = request.item_ids.len(), "created group");
                created += 1;
            }
            Err(e) => {
                warn!(title = %request.title, error = %e, "failed to create group");
            }
        }
    }

    created
}

/// Sink that keeps every request it accepts.
#[derive(Debug, Default)]
pub struct RecordingSink {
    created: Mutex<Vec<GroupRequest>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests accepted so far, in order.
    pub async fn requests(&self) -> Vec<GroupRequest> {
        self.created.lock().await.clone()
    }
}

#[async_trait]
impl GroupSink for RecordingSink {
    async fn create_group(&self, request: &GroupRequest) -> Result<()> {
        self.created.lock().await.push(request.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CategorizeError;
    use pretty_assertions::assert_eq;

    struct RejectingSink {
        inner: RecordingSink,
        reject: &'static str,
    }

    #[async_trait]
    impl GroupSink for RejectingSink {
        async fn create_group(&self, request: &GroupRequest) -> Result<()> {
            if request.title == self.reject {
                return Err(CategorizeError::Sink(format!("cannot group {}", request.title)));
            }
            self.inner.create_group(request).await
        }
    }

    #[tokio::test]
    async fn test_realize_skips_failures() {
        let sink = RejectingSink {
            inner: RecordingSink::new(),
            reject: "Broken",
        };
        let groups = vec![
            GroupRequest::new("Development", GroupColor::Grey, vec![1, 2]),
            GroupRequest::new("Broken", GroupColor::Red, vec![3]),
            GroupRequest::new("Ungrouped", GroupColor::Grey, vec![4]).collapsed(true),
        ];

        let created = realize(&groups, &sink).await;
        assert_eq!(created, 2);

        let titles: Vec<String> = sink
            .inner
            .requests()
            .await
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["Development", "Ungrouped"]);
    }

    #[tokio::test]
    async fn test_realize_empty_plan() {
        let sink = RecordingSink::new();
        assert_eq!(realize(&[], &sink).await, 0);
        assert!(sink.requests().await.is_empty());
    }
}
