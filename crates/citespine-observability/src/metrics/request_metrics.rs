//! Outcome counters per request kind.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestMetrics {
    pub queries: u64,
    pub generates: u64,
    pub grounded_answers: u64,
    pub no_evidence_answers: u64,
    pub ungrounded_fields: u64,
    pub degraded_requests: u64,
    pub rejected_requests: u64,
    pub replays: u64,
    pub replay_passes: u64,
    pub candidates_returned: u64,
}

impl RequestMetrics {
    pub fn record_query(&mut self, grounded: bool, candidates: usize) {
        self.queries += 1;
        self.candidates_returned += candidates as u64;
        if grounded {
            self.grounded_answers += 1;
        } else {
            self.no_evidence_answers += 1;
        }
    }

    pub fn record_generate(&mut self, ungrounded_fields: usize, candidates: usize) {
        self.generates += 1;
        self.candidates_returned += candidates as u64;
        self.ungrounded_fields += ungrounded_fields as u64;
    }

    /// A request that failed before producing output. `infra` separates
    /// degraded backends from rejected input.
    pub fn record_failure(&mut self, infra: bool) {
        if infra {
            self.degraded_requests += 1;
        } else {
            self.rejected_requests += 1;
        }
    }

    pub fn record_replay(&mut self, pass: bool) {
        self.replays += 1;
        if pass {
            self.replay_passes += 1;
        }
    }

    /// Share of answered queries that were grounded.
    pub fn grounded_rate(&self) -> f64 {
        if self.queries == 0 {
            return 0.0;
        }
        self.grounded_answers as f64 / self.queries as f64
    }
}
