//! Remote outages surface as DegradedService and are tracked until the
//! backend answers again. Parity runs across both backends.

mod common;

use citespine_core::config::BackendKind;
use citespine_core::errors::CiteError;
use citespine_core::traits::IManifestStore;
use citespine_observability::RecoveryStatus;
use common::{parity_queries, raw, seeded};

const REMOTE_FAST_RETRY: &str = "\
[backend]
active = \"remote\"

[router]
max_attempts = 2
backoff_base_ms = 1
backoff_cap_ms = 2
";

#[tokio::test]
async fn outage_is_surfaced_then_recovered() {
    let s = seeded(Some(REMOTE_FAST_RETRY)).await;
    let filters = raw(&[("jurisdiction", "US")]);
    s.transport.set_offline(true);

    let err = s
        .engine
        .query("lease liability", &filters, Some(5), None)
        .await
        .unwrap_err();
    match &err {
        CiteError::DegradedService { backend, attempts, .. } => {
            assert_eq!(backend, "remote");
            assert_eq!(*attempts, 2);
        }
        other => panic!("expected DegradedService, got {other:?}"),
    }
    assert!(err.is_infra());
    assert!(s.engine.is_degraded(BackendKind::Remote));
    assert!(!s.engine.is_degraded(BackendKind::Local));
    assert_eq!(s.engine.storage().degradation_count("remote").unwrap(), 1);
    assert_eq!(s.engine.metrics().requests.degraded_requests, 1);
    // Nothing is recorded for a failed call.
    assert!(s.engine.storage().list_ids().unwrap().is_empty());

    s.transport.set_offline(false);
    s.engine
        .query("lease liability", &filters, Some(5), None)
        .await
        .unwrap();
    assert!(!s.engine.is_degraded(BackendKind::Remote));
    let history = s.engine.degradations();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].event.fallback_used, "none");
    assert!(matches!(history[0].recovery_status, RecoveryStatus::Recovered));
    assert_eq!(s.engine.storage().list_ids().unwrap().len(), 1);
}

#[tokio::test]
async fn transient_failure_is_absorbed_by_retry() {
    let s = seeded(Some(REMOTE_FAST_RETRY)).await;
    s.transport.fail_next(1);
    let response = s
        .engine
        .query("lease liability", &raw(&[]), Some(5), None)
        .await
        .unwrap();
    assert!(!response.manifest_id.is_empty());
    assert!(s.engine.degradations().is_empty());
}

#[tokio::test]
async fn local_active_ignores_remote_outage() {
    let s = seeded(None).await;
    s.transport.set_offline(true);
    s.engine
        .query("lease liability", &raw(&[]), Some(5), None)
        .await
        .unwrap();
    assert!(s.engine.degradations().is_empty());
}

#[tokio::test]
async fn backends_agree_on_the_golden_set() {
    let s = seeded(Some("[retrieval]\ndefault_probes = 16\n")).await;
    let queries = parity_queries();
    let report = s
        .engine
        .parity(&queries, BackendKind::Local, BackendKind::Remote, Some(2))
        .await
        .unwrap();

    assert_eq!(report.backend_a.kind, "local");
    assert_eq!(report.backend_b.kind, "remote");
    assert_eq!(report.aggregate.query_count + report.failures.len(), queries.len());
    assert!(report.failures.is_empty(), "{:?}", report.failures);
    assert!(s.engine.parity_meets_floor(&report));
    assert!(report.per_query.iter().all(|q| q.agrees()));
    assert!(report.disagreements.is_empty());
    // Parity is read-only.
    assert!(s.engine.storage().list_ids().unwrap().is_empty());
}

#[tokio::test]
async fn parity_against_an_offline_remote_reports_failures() {
    let s = seeded(Some("[router]\nmax_attempts = 1\n")).await;
    s.transport.set_offline(true);
    let queries = parity_queries();
    let report = s
        .engine
        .parity(&queries, BackendKind::Local, BackendKind::Remote, Some(5))
        .await
        .unwrap();
    assert_eq!(report.failures.len(), queries.len());
    assert!(!s.engine.parity_meets_floor(&report));
}
