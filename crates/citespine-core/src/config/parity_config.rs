use serde::{Deserialize, Serialize};

use super::defaults;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParityConfig {
    /// Minimum mean coverage for a parity run to pass.
    pub coverage_floor: f64,
    pub top_k: usize,
}

impl Default for ParityConfig {
    fn default() -> Self {
        Self {
            coverage_floor: defaults::DEFAULT_COVERAGE_FLOOR,
            top_k: defaults::DEFAULT_PARITY_TOP_K,
        }
    }
}
