//! Test embedding providers.

#![allow(dead_code)]

use std::time::Duration;

use async_trait::async_trait;
use taborg_embeddings::{
    Embedding, EmbeddingError, EmbeddingProvider, EmbeddingRequest, EmbeddingResponse, Result,
};

pub const DIMENSION: usize = 4;

/// Returns the vector of the first rule whose substring occurs in the text,
/// or a zero vector when none does.
pub struct RuleProvider {
    rules: Vec<(&'static str, Embedding)>,
    delay: Option<Duration>,
}

impl RuleProvider {
    pub fn new(rules: Vec<(&'static str, Embedding)>) -> Self {
        Self { rules, delay: None }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn vector_for(&self, text: &str) -> Embedding {
        self.rules
            .iter()
            .find(|(needle, _)| text.contains(needle))
            .map(|(_, vector)| vector.clone())
            .unwrap_or_else(|| vec![0.0; DIMENSION])
    }
}

#[async_trait]
impl EmbeddingProvider for RuleProvider {
    fn name(&self) -> &str {
        "rules"
    }

    fn default_model(&self) -> &str {
        "rules-v1"
    }

    fn default_dimension(&self) -> usize {
        DIMENSION
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        Ok(EmbeddingResponse {
            embedding: self.vector_for(&request.text),
            model: self.default_model().to_string(),
            dimension: DIMENSION,
            tokens_used: None,
        })
    }

    fn is_available(&self) -> bool {
        true
    }
}

/// Fails every request.
pub struct FailingProvider;

#[async_trait]
impl EmbeddingProvider for FailingProvider {
    fn name(&self) -> &str {
        "failing"
    }

    fn default_model(&self) -> &str {
        "none"
    }

    fn default_dimension(&self) -> usize {
        DIMENSION
    }

    async fn embed(&self, _request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        Err(EmbeddingError::ApiRequest("service unavailable".to_string()))
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Rules used across tests: Rust content near one axis, sourdough near
/// another.
pub fn topic_rules() -> Vec<(&'static str, Embedding)> {
    vec![
        ("github", vec![1.0, 0.0, 0.0, 0.0]),
        ("Borrow checker", vec![0.98, 0.2, 0.0, 0.0]),
        ("Sourdough starter", vec![0.0, 1.0, 0.0, 0.0]),
        ("Sourdough bread", vec![0.0, 0.99, 0.1, 0.0]),
        ("Sourdough scoring", vec![0.0, 0.97, 0.2, 0.0]),
    ]
}
