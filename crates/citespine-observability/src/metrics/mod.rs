//! Request counters and rolling latency windows.

pub mod latency;
pub mod request_metrics;

use serde::{Deserialize, Serialize};

pub use latency::LatencyMetrics;
pub use request_metrics::RequestMetrics;

/// Aggregates all metric families.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsCollector {
    pub latency: LatencyMetrics,
    pub requests: RequestMetrics,
}

impl MetricsCollector {
    pub fn new(latency_budget_ms: u64, latency_window: usize) -> Self {
        Self {
            latency: LatencyMetrics::new(latency_budget_ms, latency_window),
            requests: RequestMetrics::default(),
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.latency.budget_ms(), self.latency.window());
    }
}
