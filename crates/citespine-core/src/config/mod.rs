//! Configuration tree. Every section is `#[serde(default)]`, so a partial
//! TOML document only overrides what it names.

pub mod backend_config;
pub mod defaults;
pub mod embedding_config;
pub mod grounding_config;
pub mod manifest_config;
pub mod observability_config;
pub mod parity_config;
pub mod retrieval_config;
pub mod router_config;
pub mod storage_config;
pub mod vocabulary_config;

use std::path::Path;

use serde::{Deserialize, Serialize};

pub use backend_config::{BackendConfig, BackendKind, LocalBackendConfig, RemoteBackendConfig};
pub use embedding_config::{EmbeddingConfig, EmbeddingProviderKind};
pub use grounding_config::{GroundingConfig, SchemaConfig, SchemaFieldConfig};
pub use manifest_config::{ManifestConfig, ManifestStoreKind};
pub use observability_config::ObservabilityConfig;
pub use parity_config::ParityConfig;
pub use retrieval_config::RetrievalConfig;
pub use router_config::RouterConfig;
pub use storage_config::StorageConfig;
pub use vocabulary_config::{VocabularyConfig, VocabularyTerm};

use crate::errors::{CiteError, CiteResult};

/// Top-level engine configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CiteConfig {
    pub storage: StorageConfig,
    pub retrieval: RetrievalConfig,
    pub router: RouterConfig,
    pub backend: BackendConfig,
    pub grounding: GroundingConfig,
    pub embedding: EmbeddingConfig,
    pub manifest: ManifestConfig,
    pub parity: ParityConfig,
    pub observability: ObservabilityConfig,
    pub vocabulary: VocabularyConfig,
}

impl CiteConfig {
    /// Parse a TOML document, filling unspecified values with defaults.
    pub fn from_toml(toml_str: &str) -> CiteResult<Self> {
        let config: Self =
            toml::from_str(toml_str).map_err(|e| CiteError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and parse a TOML file.
    pub fn from_file(path: &Path) -> CiteResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| CiteError::ConfigError(format!("{}: {e}", path.display())))?;
        Self::from_toml(&content)
    }

    /// Reject values that would make the engine misbehave at runtime.
    pub fn validate(&self) -> CiteResult<()> {
        let threshold = self.grounding.entailment_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(CiteError::ConfigError(format!(
                "grounding.entailment_threshold must be in [0, 1], got {threshold}"
            )));
        }
        let similarity = self.manifest.answer_similarity_threshold;
        if !(0.0..=1.0).contains(&similarity) {
            return Err(CiteError::ConfigError(format!(
                "manifest.answer_similarity_threshold must be in [0, 1], got {similarity}"
            )));
        }
        if self.router.max_attempts == 0 {
            return Err(CiteError::ConfigError(
                "router.max_attempts must be at least 1".into(),
            ));
        }
        if self.router.max_in_flight == 0 {
            return Err(CiteError::ConfigError(
                "router.max_in_flight must be at least 1".into(),
            ));
        }
        if self.backend.local.partition_bits > 16 {
            return Err(CiteError::ConfigError(format!(
                "backend.local.partition_bits must be at most 16, got {}",
                self.backend.local.partition_bits
            )));
        }
        if self.embedding.dimensions == 0 {
            return Err(CiteError::ConfigError(
                "embedding.dimensions must be positive".into(),
            ));
        }
        if chrono::NaiveDate::parse_from_str(&self.retrieval.default_as_of, "%Y-%m-%d").is_err() {
            return Err(CiteError::ConfigError(format!(
                "retrieval.default_as_of is not an ISO date: {}",
                self.retrieval.default_as_of
            )));
        }
        Ok(())
    }
}
