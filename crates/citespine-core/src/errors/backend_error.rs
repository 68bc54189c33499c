/// Errors raised by vector-store backends. Adapters report these once and
/// never retry; retry policy lives in the router.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BackendError {
    #[error("backend {backend} unavailable: {reason}")]
    Unavailable { backend: String, reason: String },

    #[error("backend {backend} timed out after {timeout_ms}ms")]
    Timeout { backend: String, timeout_ms: u64 },

    #[error("backend {backend} returned chunk {chunk_id} violating the active filter on {dimension}")]
    PredicateViolation {
        backend: String,
        chunk_id: String,
        dimension: String,
    },

    #[error("embedding dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("invalid response from backend {backend}: {reason}")]
    InvalidResponse { backend: String, reason: String },
}

impl BackendError {
    /// Unavailable and Timeout are transient; everything else is a contract
    /// or request problem and must not be retried.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            BackendError::Unavailable { .. } | BackendError::Timeout { .. }
        )
    }
}
