//! Every refused request after exhausted retries is recorded here, per
//! backend, until the backend answers again.

use chrono::{DateTime, Utc};
use citespine_core::models::DegradationEvent;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecoveryStatus {
    Active,
    Recovered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackedDegradation {
    pub event: DegradationEvent,
    pub recovery_status: RecoveryStatus,
    pub recovered_at: Option<DateTime<Utc>>,
}

/// In-memory degradation history with recovery marking.
#[derive(Debug, Clone, Default)]
pub struct DegradationTracker {
    events: Vec<TrackedDegradation>,
}

impl DegradationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the event for a backend that exhausted its retries. No fallback
    /// backend is ever substituted, so `fallback_used` is always "none".
    pub fn event_for(component: &str, failure: &str) -> DegradationEvent {
        DegradationEvent {
            component: component.to_string(),
            failure: failure.to_string(),
            fallback_used: "none".to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn record(&mut self, event: DegradationEvent) {
        crate::tracing_setup::events::degradation_triggered(
            &event.component,
            &event.failure,
            &event.fallback_used,
        );
        self.events.push(TrackedDegradation {
            event,
            recovery_status: RecoveryStatus::Active,
            recovered_at: None,
        });
    }

    /// Close every active degradation of `component`. Returns how many were
    /// closed; zero means the component was healthy already.
    pub fn mark_recovered(&mut self, component: &str) -> usize {
        let now = Utc::now();
        let mut closed = 0;
        for tracked in self
            .events
            .iter_mut()
            .filter(|t| t.event.component == component && t.recovery_status == RecoveryStatus::Active)
        {
            tracked.recovery_status = RecoveryStatus::Recovered;
            tracked.recovered_at = Some(now);
            closed += 1;
        }
        if closed > 0 {
            crate::tracing_setup::events::degradation_recovered(component);
        }
        closed
    }

    pub fn is_degraded(&self, component: &str) -> bool {
        self.events
            .iter()
            .any(|t| t.event.component == component && t.recovery_status == RecoveryStatus::Active)
    }

    pub fn events(&self) -> &[TrackedDegradation] {
        &self.events
    }

    pub fn active_degradations(&self) -> Vec<&TrackedDegradation> {
        self.events
            .iter()
            .filter(|t| t.recovery_status == RecoveryStatus::Active)
            .collect()
    }

    /// Events for `component` within the last `window_secs` seconds.
    pub fn count_recent(&self, component: &str, window_secs: i64) -> usize {
        let cutoff = Utc::now() - chrono::Duration::seconds(window_secs);
        self.events
            .iter()
            .filter(|t| t.event.component == component && t.event.timestamp > cutoff)
            .count()
    }

    /// How long `component` has been continuously degraded, if it is.
    pub fn degraded_duration(&self, component: &str) -> Option<chrono::Duration> {
        self.events
            .iter()
            .filter(|t| t.event.component == component && t.recovery_status == RecoveryStatus::Active)
            .map(|t| t.event.timestamp)
            .min()
            .map(|since| Utc::now() - since)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovery_closes_only_the_named_component() {
        let mut tracker = DegradationTracker::new();
        tracker.record(DegradationTracker::event_for("remote", "timeout"));
        tracker.record(DegradationTracker::event_for("remote", "unavailable"));
        tracker.record(DegradationTracker::event_for("local", "unavailable"));

        assert_eq!(tracker.mark_recovered("remote"), 2);
        assert!(!tracker.is_degraded("remote"));
        assert!(tracker.is_degraded("local"));
        assert_eq!(tracker.active_degradations().len(), 1);
        assert_eq!(tracker.events().len(), 3);
        assert_eq!(tracker.mark_recovered("remote"), 0);
    }

    #[test]
    fn duration_is_none_when_healthy() {
        let mut tracker = DegradationTracker::new();
        assert!(tracker.degraded_duration("local").is_none());
        tracker.record(DegradationTracker::event_for("local", "unavailable"));
        assert!(tracker.degraded_duration("local").is_some());
        tracker.mark_recovered("local");
        assert!(tracker.degraded_duration("local").is_none());
    }

    #[test]
    fn fallback_is_never_used() {
        let event = DegradationTracker::event_for("remote", "timeout");
        assert_eq!(event.fallback_used, "none");
    }
}
