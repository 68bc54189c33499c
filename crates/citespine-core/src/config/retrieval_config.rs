use serde::{Deserialize, Serialize};

use super::defaults;

/// Request-level retrieval defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// As-of date applied when a request carries none (ISO `YYYY-MM-DD`).
    pub default_as_of: String,
    /// Result count when a request carries none.
    pub default_top_k: usize,
    /// Upper bound on any requested top-k.
    pub max_top_k: usize,
    /// Approximate-search probe count when a request carries none.
    pub default_probes: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_as_of: defaults::DEFAULT_AS_OF.to_string(),
            default_top_k: defaults::DEFAULT_TOP_K,
            max_top_k: defaults::MAX_TOP_K,
            default_probes: defaults::DEFAULT_PROBES,
        }
    }
}
