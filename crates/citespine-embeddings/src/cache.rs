//! In-memory query-embedding cache (moka), keyed by blake3 of model id + text.

use std::time::Duration;

use moka::sync::Cache;

use citespine_core::errors::CiteResult;
use citespine_core::traits::IQueryEmbedder;

pub struct QueryEmbeddingCache {
    cache: Cache<String, Vec<f32>>,
}

impl QueryEmbeddingCache {
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();
        Self { cache }
    }

    pub fn key(model_id: &str, text: &str) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(model_id.as_bytes());
        hasher.update(&[0]);
        hasher.update(text.as_bytes());
        hasher.finalize().to_hex().to_string()
    }

    pub fn get(&self, key: &str) -> Option<Vec<f32>> {
        self.cache.get(key)
    }

    pub fn insert(&self, key: String, embedding: Vec<f32>) {
        self.cache.insert(key, embedding);
    }

    pub fn entry_count(&self) -> u64 {
        self.cache.run_pending_tasks();
        self.cache.entry_count()
    }

    pub fn clear(&self) {
        self.cache.invalidate_all();
    }
}

/// Wraps an embedder with `QueryEmbeddingCache`.
pub struct CachedEmbedder<E> {
    inner: E,
    cache: QueryEmbeddingCache,
}

impl<E: IQueryEmbedder> CachedEmbedder<E> {
    pub fn new(inner: E, cache: QueryEmbeddingCache) -> Self {
        Self { inner, cache }
    }

    pub fn inner(&self) -> &E {
        &self.inner
    }

    pub fn cache(&self) -> &QueryEmbeddingCache {
        &self.cache
    }
}

impl<E: IQueryEmbedder> IQueryEmbedder for CachedEmbedder<E> {
    fn model_id(&self) -> &str {
        self.inner.model_id()
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    async fn embed(&self, text: &str) -> CiteResult<Vec<f32>> {
        let key = QueryEmbeddingCache::key(self.inner.model_id(), text);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }
        let embedding = self.inner.embed(text).await?;
        self.cache.insert(key, embedding.clone());
        Ok(embedding)
    }
}
