/// Query-embedding errors.
#[derive(Debug, thiserror::Error)]
pub enum EmbeddingError {
    #[error("inference failed: {reason}")]
    InferenceFailed { reason: String },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("provider unavailable: {provider}")]
    ProviderUnavailable { provider: String },
}

impl EmbeddingError {
    /// A dimension mismatch is a configuration fault; the rest can clear up.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            EmbeddingError::InferenceFailed { .. } | EmbeddingError::ProviderUnavailable { .. }
        )
    }
}
