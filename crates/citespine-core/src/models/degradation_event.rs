use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Recorded when a backend exhausts its retries and a request is refused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationEvent {
    pub component: String,
    pub failure: String,
    /// Always "none": a degraded backend is never substituted.
    pub fallback_used: String,
    pub timestamp: DateTime<Utc>,
}
