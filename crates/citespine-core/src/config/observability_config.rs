use serde::{Deserialize, Serialize};

use super::defaults;

/// Observability subsystem configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub log_level: String,
    /// End-to-end latency budget; requests above it are logged as slow.
    pub latency_budget_ms: u64,
    /// Number of recent latency samples kept per operation.
    pub latency_window: usize,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: defaults::DEFAULT_LOG_LEVEL.to_string(),
            latency_budget_ms: defaults::DEFAULT_LATENCY_BUDGET_MS,
            latency_window: defaults::DEFAULT_LATENCY_WINDOW,
        }
    }
}
