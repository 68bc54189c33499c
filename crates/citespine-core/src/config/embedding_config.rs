use serde::{Deserialize, Serialize};

use super::defaults;

/// Query-embedding provider selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmbeddingProviderKind {
    /// Deterministic feature-hashing embedder. Works air-gapped.
    Hashed,
    /// Remote embedding API.
    Api,
}

/// Query-embedding configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub provider: EmbeddingProviderKind,
    pub dimensions: usize,
    /// Model identifier recorded in manifests.
    pub model_id: String,
    pub api_endpoint: Option<String>,
    pub api_key_env: Option<String>,
    pub api_timeout_ms: u64,
    pub api_max_retries: u32,
    /// How long the provider is skipped after its retries are exhausted.
    pub api_cooldown_ms: u64,
    pub cache_size: u64,
    pub cache_ttl_secs: u64,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: EmbeddingProviderKind::Hashed,
            dimensions: crate::constants::EMBEDDING_DIMENSIONS,
            model_id: defaults::DEFAULT_EMBEDDING_MODEL.to_string(),
            api_endpoint: None,
            api_key_env: None,
            api_timeout_ms: defaults::DEFAULT_EMBED_API_TIMEOUT_MS,
            api_max_retries: defaults::DEFAULT_EMBED_API_MAX_RETRIES,
            api_cooldown_ms: defaults::DEFAULT_EMBED_API_COOLDOWN_MS,
            cache_size: defaults::DEFAULT_EMBED_CACHE_SIZE,
            cache_ttl_secs: defaults::DEFAULT_EMBED_CACHE_TTL_SECS,
        }
    }
}
