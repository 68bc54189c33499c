//! Structured log events for request-path milestones.

pub fn candidates_retrieved(backend: &str, candidates: usize, attempts: u32) {
    tracing::info!(
        event = "candidates_retrieved",
        backend = %backend,
        candidates,
        attempts,
        "candidates retrieved"
    );
}

/// A backend call is being retried after a transient failure.
pub fn backend_retry(backend: &str, attempt: u32, error: &str) {
    tracing::warn!(
        event = "backend_retry",
        backend = %backend,
        attempt,
        error = %error,
        "backend retry"
    );
}

/// A component exhausted its retries. No fallback is ever substituted.
pub fn degradation_triggered(component: &str, failure: &str, fallback: &str) {
    tracing::warn!(
        event = "degradation_triggered",
        component = %component,
        failure = %failure,
        fallback = %fallback,
        "degradation triggered"
    );
}

pub fn degradation_recovered(component: &str) {
    tracing::info!(
        event = "degradation_recovered",
        component = %component,
        "degradation recovered"
    );
}

pub fn manifest_recorded(manifest_id: &str, operation: &str, latency_ms: u64) {
    tracing::info!(
        event = "manifest_recorded",
        manifest_id = %manifest_id,
        operation = %operation,
        latency_ms,
        "manifest recorded"
    );
}

pub fn replay_completed(manifest_id: &str, retrieval_identity: bool, answer_similarity: f64, pass: bool) {
    if pass {
        tracing::info!(
            event = "replay_completed",
            manifest_id = %manifest_id,
            retrieval_identity,
            answer_similarity,
            pass,
            "replay completed"
        );
    } else {
        tracing::warn!(
            event = "replay_completed",
            manifest_id = %manifest_id,
            retrieval_identity,
            answer_similarity,
            pass,
            "replay mismatch"
        );
    }
}

pub fn parity_completed(backend_a: &str, backend_b: &str, queries: usize, mean_coverage: f64, meets_floor: bool) {
    tracing::info!(
        event = "parity_completed",
        backend_a = %backend_a,
        backend_b = %backend_b,
        queries,
        mean_coverage,
        meets_floor,
        "parity completed"
    );
}

/// A request finished above the latency budget.
pub fn latency_budget_exceeded(operation: &str, latency_ms: u64, budget_ms: u64) {
    tracing::warn!(
        event = "latency_budget_exceeded",
        operation = %operation,
        latency_ms,
        budget_ms,
        "latency budget exceeded"
    );
}
