use serde::{Deserialize, Serialize};

use super::defaults;

/// Retry, timeout, and concurrency policy applied around backend calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Total attempts per backend call, including the first.
    pub max_attempts: u32,
    /// Base delay for exponential backoff.
    pub backoff_base_ms: u64,
    /// Ceiling for a single backoff delay.
    pub backoff_cap_ms: u64,
    /// Per-attempt timeout.
    pub timeout_ms: u64,
    /// Maximum concurrent backend calls per router.
    pub max_in_flight: usize,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_attempts: defaults::DEFAULT_MAX_ATTEMPTS,
            backoff_base_ms: defaults::DEFAULT_BACKOFF_BASE_MS,
            backoff_cap_ms: defaults::DEFAULT_BACKOFF_CAP_MS,
            timeout_ms: defaults::DEFAULT_BACKEND_TIMEOUT_MS,
            max_in_flight: defaults::DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

impl RouterConfig {
    /// Backoff before retry number `attempt` (1-based): base * 2^(attempt-1), capped.
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let shift = attempt.saturating_sub(1).min(20);
        self.backoff_base_ms
            .saturating_mul(1u64 << shift)
            .min(self.backoff_cap_ms)
    }
}
