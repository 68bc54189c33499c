//! Span definitions per operation: query, generate, replay, parity, backend call.

/// Create a query span.
#[macro_export]
macro_rules! query_span {
    ($top_k:expr, $backend:expr) => {
        $crate::tracing::info_span!("citespine.query", top_k = $top_k, backend = %$backend)
    };
}

/// Create a generate span.
#[macro_export]
macro_rules! generate_span {
    ($schema:expr, $backend:expr) => {
        $crate::tracing::info_span!("citespine.generate", schema = %$schema, backend = %$backend)
    };
}

/// Create a replay span.
#[macro_export]
macro_rules! replay_span {
    ($manifest_id:expr) => {
        $crate::tracing::info_span!("citespine.replay", manifest_id = %$manifest_id)
    };
}

/// Create a parity span.
#[macro_export]
macro_rules! parity_span {
    ($backend_a:expr, $backend_b:expr, $queries:expr) => {
        $crate::tracing::info_span!(
            "citespine.parity",
            backend_a = %$backend_a,
            backend_b = %$backend_b,
            queries = $queries
        )
    };
}

/// Create a span around one backend attempt.
#[macro_export]
macro_rules! backend_span {
    ($backend:expr, $attempt:expr) => {
        $crate::tracing::debug_span!("citespine.backend", backend = %$backend, attempt = $attempt)
    };
}

/// Create a span around one ingest record.
#[macro_export]
macro_rules! ingest_span {
    ($chunk_id:expr) => {
        $crate::tracing::debug_span!("citespine.ingest", chunk_id = %$chunk_id)
    };
}

/// Span names as constants for programmatic use.
pub mod names {
    pub const QUERY: &str = "citespine.query";
    pub const GENERATE: &str = "citespine.generate";
    pub const REPLAY: &str = "citespine.replay";
    pub const PARITY: &str = "citespine.parity";
    pub const BACKEND: &str = "citespine.backend";
    pub const INGEST: &str = "citespine.ingest";
}
