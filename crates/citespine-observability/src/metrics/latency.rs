//! Rolling per-operation latency windows with P95 against the end-to-end budget.

use std::collections::{BTreeMap, VecDeque};

use citespine_core::config::defaults;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LatencyMetrics {
    budget_ms: u64,
    window: usize,
    samples: BTreeMap<String, VecDeque<u64>>,
    over_budget: BTreeMap<String, u64>,
}

impl Default for LatencyMetrics {
    fn default() -> Self {
        Self::new(defaults::DEFAULT_LATENCY_BUDGET_MS, defaults::DEFAULT_LATENCY_WINDOW)
    }
}

impl LatencyMetrics {
    pub fn new(budget_ms: u64, window: usize) -> Self {
        Self {
            budget_ms,
            window: window.max(1),
            samples: BTreeMap::new(),
            over_budget: BTreeMap::new(),
        }
    }

    pub fn budget_ms(&self) -> u64 {
        self.budget_ms
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Record one sample. Returns false when it exceeded the budget.
    pub fn record(&mut self, operation: &str, latency_ms: u64) -> bool {
        let window = self.samples.entry(operation.to_string()).or_default();
        if window.len() == self.window {
            window.pop_front();
        }
        window.push_back(latency_ms);

        let within = latency_ms <= self.budget_ms;
        if !within {
            *self.over_budget.entry(operation.to_string()).or_default() += 1;
            crate::tracing_setup::events::latency_budget_exceeded(operation, latency_ms, self.budget_ms);
        }
        within
    }

    pub fn sample_count(&self, operation: &str) -> usize {
        self.samples.get(operation).map_or(0, VecDeque::len)
    }

    pub fn over_budget_count(&self, operation: &str) -> u64 {
        self.over_budget.get(operation).copied().unwrap_or(0)
    }

    /// Nearest-rank percentile over the current window, `pct` in (0, 100].
    pub fn percentile(&self, operation: &str, pct: f64) -> Option<u64> {
        let window = self.samples.get(operation)?;
        if window.is_empty() {
            return None;
        }
        let mut sorted: Vec<u64> = window.iter().copied().collect();
        sorted.sort_unstable();
        let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
        Some(sorted[rank.clamp(1, sorted.len()) - 1])
    }

    pub fn p95(&self, operation: &str) -> Option<u64> {
        self.percentile(operation, 95.0)
    }

    /// Whether the P95 of `operation` is within budget. Vacuously true with no samples.
    pub fn within_budget(&self, operation: &str) -> bool {
        self.p95(operation).map_or(true, |p| p <= self.budget_ms)
    }
}
