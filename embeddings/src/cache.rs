//! Embedding cache so repeated tab texts are embedded once.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::Embedding;
use crate::error::{EmbeddingError, Result};
use crate::provider::{EmbeddingProvider, EmbeddingRequest, EmbeddingResponse};

/// Cache entry for an embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Hash of the embedded text and model.
    pub text_hash: String,

    /// The embedding vector.
    pub embedding: Embedding,

    /// Model used to generate the embedding.
    pub model: String,

    /// When the entry was created (seconds since the epoch).
    pub created_at: u64,
}

/// Bounded cache for embeddings to avoid redundant provider calls.
pub struct EmbeddingCache {
    /// In-memory cache.
    cache: Arc<RwLock<HashMap<String, CacheEntry>>>,

    /// Path for persistent cache storage.
    cache_path: Option<PathBuf>,

    /// Maximum cache size.
    max_entries: usize,
}

impl EmbeddingCache {
    /// Create a new in-memory cache.
    pub fn new(max_entries: usize) -> Self {
        Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            cache_path: None,
            max_entries,
        }
    }

    /// Create a cache with persistent storage.
    pub async fn with_persistence(path: impl AsRef<Path>, max_entries: usize) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let cache = Self {
            cache: Arc::new(RwLock::new(HashMap::new())),
            cache_path: Some(path.clone()),
            max_entries,
        };

        if path.exists() {
            cache.load().await?;
        }

        Ok(cache)
    }

    /// Compute a hash for cache lookup.
    fn hash_key(text: &str, model: &str) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        text.hash(&mut hasher);
        model.hash(&mut hasher);
        format!("{:x}", hasher.finish())
    }

    fn now_secs() -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default()
    }

    /// Get an embedding from the cache.
    pub async fn get(&self, text: &str, model: &str) -> Option<Embedding> {
        let key = Self::hash_key(text, model);
        let cache = self.cache.read().await;
        cache.get(&key).map(|e| e.embedding.clone())
    }

    /// Put an embedding in the cache.
    pub async fn put(&self, text: &str, model: &str, embedding: Embedding) -> Result<()> {
        self.put_many(model, vec![(text.to_string(), embedding)])
            .await
    }

    /// Put several embeddings for one model, persisting once.
    pub async fn put_many(&self, model: &str, entries: Vec<(String, Embedding)>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut cache = self.cache.write().await;
        for (text, embedding) in entries {
            let key = Self::hash_key(&text, model);

            if !cache.contains_key(&key) && cache.len() >= self.max_entries {
                if let Some(oldest_key) = cache
                    .iter()
                    .min_by_key(|(_, v)| v.created_at)
                    .map(|(k, _)| k.clone())
                {
                    cache.remove(&oldest_key);
                }
            }

            cache.insert(
                key.clone(),
                CacheEntry {
                    text_hash: key,
                    embedding,
                    model: model.to_string(),
                    created_at: Self::now_secs(),
                },
            );
        }
        debug!("Cached embeddings (model: {model})");

        if self.cache_path.is_some() {
            drop(cache); // Release lock before I/O
            self.save().await?;
        }

        Ok(())
    }

    /// Check if an embedding is cached.
    pub async fn contains(&self, text: &str, model: &str) -> bool {
        let key = Self::hash_key(text, model);
        self.cache.read().await.contains_key(&key)
    }

    /// Clear the entire cache.
    pub async fn clear(&self) {
        self.cache.write().await.clear();
        info!("Cleared embedding cache");
    }

    /// Get cache statistics.
    pub async fn stats(&self) -> CacheStats {
        let cache = self.cache.read().await;
        CacheStats {
            entries: cache.len(),
            max_entries: self.max_entries,
        }
    }

    /// Save cache to disk.
    async fn save(&self) -> Result<()> {
        if let Some(ref path) = self.cache_path {
            let cache = self.cache.read().await;
            let entries: Vec<&CacheEntry> = cache.values().collect();
            let content = serde_json::to_string(&entries)?;

            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }

            fs::write(path, content).await?;
            debug!("Saved {} cache entries to disk", entries.len());
        }
        Ok(())
    }

    /// Load cache from disk.
    async fn load(&self) -> Result<()> {
        if let Some(ref path) = self.cache_path {
            let content = fs::read_to_string(path).await?;
            let entries: Vec<CacheEntry> = serde_json::from_str(&content)?;

            let mut cache = self.cache.write().await;
            for entry in entries {
                cache.insert(entry.text_hash.clone(), entry);
            }

            info!("Loaded {} cache entries from disk", cache.len());
        }
        Ok(())
    }
}

/// Statistics about the embedding cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    /// Number of entries in cache.
    pub entries: usize,

    /// Maximum cache size.
    pub max_entries: usize,
}

/// A provider wrapper that answers from the cache where it can.
pub struct CachedProvider<P> {
    provider: P,
    cache: EmbeddingCache,
}

impl<P> CachedProvider<P>
where
    P: EmbeddingProvider,
{
    /// Create a new cached provider.
    pub fn new(provider: P, cache: EmbeddingCache) -> Self {
        Self { provider, cache }
    }

    /// Get the underlying cache.
    pub fn cache(&self) -> &EmbeddingCache {
        &self.cache
    }

    fn model_for(&self, request: &EmbeddingRequest) -> String {
        request
            .model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string())
    }
}

#[async_trait]
impl<P> EmbeddingProvider for CachedProvider<P>
where
    P: EmbeddingProvider,
{
    fn name(&self) -> &str {
        self.provider.name()
    }

    fn default_model(&self) -> &str {
        self.provider.default_model()
    }

    fn default_dimension(&self) -> usize {
        self.provider.default_dimension()
    }

    async fn embed(&self, request: EmbeddingRequest) -> Result<EmbeddingResponse> {
        let model = self.model_for(&request);

        if let Some(embedding) = self.cache.get(&request.text, &model).await {
            debug!("Cache hit for embedding");
            return Ok(EmbeddingResponse {
                dimension: embedding.len(),
                embedding,
                model,
                tokens_used: None,
            });
        }

        let text = request.text.clone();
        let response = self.provider.embed(request).await?;
        // Entries stay in memory even when the write to disk fails
        if let Err(e) = self
            .cache
            .put(&text, &model, response.embedding.clone())
            .await
        {
            warn!(error = %e, "failed to persist embedding cache");
        }

        Ok(response)
    }

    async fn embed_batch(&self, requests: Vec<EmbeddingRequest>) -> Result<Vec<EmbeddingResponse>> {
        let mut slots: Vec<Option<EmbeddingResponse>> = Vec::with_capacity(requests.len());
        let mut misses: Vec<(usize, EmbeddingRequest)> = Vec::new();

        for (idx, request) in requests.into_iter().enumerate() {
            let model = self.model_for(&request);
            match self.cache.get(&request.text, &model).await {
                Some(embedding) => slots.push(Some(EmbeddingResponse {
                    dimension: embedding.len(),
                    embedding,
                    model,
                    tokens_used: None,
                })),
                None => {
                    slots.push(None);
                    misses.push((idx, request));
                }
            }
        }

        debug!(
            "Embedding cache: {} hits, {} misses",
            slots.len() - misses.len(),
            misses.len()
        );

        if !misses.is_empty() {
            // A batch goes out under a single model, as the providers send it.
            let model = self.model_for(&misses[0].1);
            let texts: Vec<String> = misses.iter().map(|(_, r)| r.text.clone()).collect();
            let (positions, pending): (Vec<usize>, Vec<EmbeddingRequest>) =
                misses.into_iter().unzip();
            let fresh = self.provider.embed_batch(pending).await?;

            if fresh.len() != positions.len() {
                return Err(EmbeddingError::InvalidResponse(format!(
                    "expected {} embeddings, got {}",
                    positions.len(),
                    fresh.len()
                )));
            }

            let to_cache = texts
                .into_iter()
                .zip(fresh.iter().map(|r| r.embedding.clone()))
                .collect();
            if let Err(e) = self.cache.put_many(&model, to_cache).await {
                warn!(error = %e, "failed to persist embedding cache");
            }

            for (idx, response) in positions.into_iter().zip(fresh) {
                slots[idx] = Some(response);
            }
        }

        Ok(slots.into_iter().flatten().collect())
    }

    fn is_available(&self) -> bool {
        self.provider.is_available()
    }
}
