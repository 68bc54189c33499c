//! Config-selected provider.

use std::time::Duration;

use citespine_core::config::{EmbeddingConfig, EmbeddingProviderKind};
use citespine_core::errors::{CiteError, CiteResult};
use citespine_core::traits::IQueryEmbedder;

use crate::cache::{CachedEmbedder, QueryEmbeddingCache};
use crate::providers::{ApiEmbedder, HashedEmbedder};

pub enum EmbeddingProvider {
    Hashed(HashedEmbedder),
    Api(ApiEmbedder),
}

impl EmbeddingProvider {
    /// Build the configured provider. The API provider needs an endpoint.
    pub fn from_config(config: &EmbeddingConfig) -> CiteResult<Self> {
        match config.provider {
            EmbeddingProviderKind::Hashed => {
                Ok(Self::Hashed(HashedEmbedder::new(config.dimensions)))
            }
            EmbeddingProviderKind::Api => {
                let endpoint = config.api_endpoint.clone().ok_or_else(|| {
                    CiteError::ConfigError("embedding.api_endpoint is required for the api provider".into())
                })?;
                let api_key = config
                    .api_key_env
                    .as_deref()
                    .and_then(|var| std::env::var(var).ok());
                let api = ApiEmbedder::new(
                    endpoint,
                    api_key,
                    config.model_id.clone(),
                    config.dimensions,
                    Duration::from_millis(config.api_timeout_ms),
                    config.api_max_retries,
                    Duration::from_millis(config.api_cooldown_ms),
                )?;
                Ok(Self::Api(api))
            }
        }
    }

    /// Build the configured provider behind the query cache.
    pub fn cached_from_config(config: &EmbeddingConfig) -> CiteResult<CachedEmbedder<Self>> {
        let provider = Self::from_config(config)?;
        let cache = QueryEmbeddingCache::new(
            config.cache_size,
            Duration::from_secs(config.cache_ttl_secs),
        );
        Ok(CachedEmbedder::new(provider, cache))
    }
}

impl IQueryEmbedder for EmbeddingProvider {
    fn model_id(&self) -> &str {
        match self {
            Self::Hashed(p) => p.model_id(),
            Self::Api(p) => p.model_id(),
        }
    }

    fn dimensions(&self) -> usize {
        match self {
            Self::Hashed(p) => p.dimensions(),
            Self::Api(p) => p.dimensions(),
        }
    }

    async fn embed(&self, text: &str) -> CiteResult<Vec<f32>> {
        match self {
            Self::Hashed(p) => p.embed(text).await,
            Self::Api(p) => p.embed(text).await,
        }
    }
}
