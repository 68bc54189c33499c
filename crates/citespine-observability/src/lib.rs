//! # citespine-observability
//!
//! Structured tracing (JSON, `CITESPINE_LOG` filter) with per-operation
//! spans and events, backend degradation tracking with recovery marking,
//! and rolling latency metrics checked against the end-to-end budget.

pub mod degradation;
pub mod metrics;
pub mod tracing_setup;

pub use degradation::{DegradationTracker, RecoveryStatus, TrackedDegradation};
pub use metrics::{LatencyMetrics, MetricsCollector, RequestMetrics};

#[doc(hidden)]
pub use tracing;
