use super::{BackendError, EmbeddingError, ManifestError, StorageError, VersionError};

/// Top-level error type for the CiteSpine engine.
#[derive(Debug, thiserror::Error)]
pub enum CiteError {
    #[error("invalid filter value for '{key}': {value}")]
    InvalidFilterValue { key: String, value: String },

    #[error("manifest not found: {id}")]
    ManifestNotFound { id: String },

    #[error("unknown artifact schema: {name}")]
    UnknownSchema { name: String },

    #[error("degraded service: backend {backend} failed after {attempts} attempts: {last_error}")]
    DegradedService {
        backend: String,
        attempts: u32,
        last_error: String,
    },

    #[error("backend not configured: {backend}")]
    BackendNotConfigured { backend: String },

    #[error("invalid ingest record {chunk_id}: {reason}")]
    InvalidRecord { chunk_id: String, reason: String },

    #[error("storage error: {0}")]
    StorageError(#[from] StorageError),

    #[error("backend error: {0}")]
    BackendError(#[from] BackendError),

    #[error("embedding error: {0}")]
    EmbeddingError(#[from] EmbeddingError),

    #[error("version error: {0}")]
    VersionError(#[from] VersionError),

    #[error("manifest error: {0}")]
    ManifestError(#[from] ManifestError),

    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("config error: {0}")]
    ConfigError(String),
}

impl CiteError {
    /// Whether this error originates from transient infrastructure rather than
    /// from the request itself. Infra errors are eligible for retry and are
    /// reported with the `infra` tag.
    pub fn is_infra(&self) -> bool {
        match self {
            CiteError::BackendError(e) => e.is_transient(),
            CiteError::EmbeddingError(e) => e.is_transient(),
            CiteError::DegradedService { .. } => true,
            _ => false,
        }
    }

    /// Short tag used in structured logs.
    pub fn tag(&self) -> &'static str {
        if self.is_infra() {
            "infra"
        } else {
            "request"
        }
    }
}

/// Convenience alias used throughout the workspace.
pub type CiteResult<T> = Result<T, CiteError>;
