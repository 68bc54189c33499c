//! In-process hosted-index service.
//!
//! Speaks the same request/response types as the HTTP service and evaluates
//! filters with the shared grammar. Used when no endpoint is configured and
//! by tests, which can inject outages and latency.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::time::Duration;

use dashmap::DashMap;

use citespine_core::constants::BACKEND_REMOTE;
use citespine_core::errors::BackendError;

use super::filter;
use super::protocol::{
    QueryMatch, QueryRequest, QueryResponse, RemoteRecord, StatsRequest, StatsResponse, UpsertRequest,
    UpsertResponse,
};
use super::transport::IRemoteTransport;
use crate::similarity::cosine_similarity;

#[derive(Default)]
pub struct LoopbackTransport {
    namespaces: DashMap<String, HashMap<String, RemoteRecord>>,
    fail_next: AtomicU32,
    offline: AtomicBool,
    latency_ms: AtomicU64,
    calls: AtomicU64,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `n` calls with `Unavailable`.
    pub fn fail_next(&self, n: u32) {
        self.fail_next.store(n, Ordering::SeqCst);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Delay applied before every call.
    pub fn set_latency(&self, latency: Duration) {
        self.latency_ms
            .store(latency.as_millis() as u64, Ordering::SeqCst);
    }

    /// Calls received, including failed ones.
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Overwrite a stored record's metadata. Lets tests simulate a service
    /// that echoes stale or wrong metadata.
    pub fn corrupt_metadata(&self, namespace: &str, id: &str, key: &str, value: serde_json::Value) -> bool {
        self.namespaces
            .get_mut(namespace)
            .and_then(|mut ns| ns.get_mut(id).map(|r| r.metadata.insert(key.to_string(), value)))
            .is_some()
    }

    async fn enter(&self) -> Result<(), BackendError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let latency = self.latency_ms.load(Ordering::SeqCst);
        if latency > 0 {
            tokio::time::sleep(Duration::from_millis(latency)).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(unavailable("service offline"));
        }
        let injected = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected {
            return Err(unavailable("injected fault"));
        }
        Ok(())
    }
}

fn unavailable(reason: &str) -> BackendError {
    BackendError::Unavailable {
        backend: BACKEND_REMOTE.to_string(),
        reason: reason.to_string(),
    }
}

impl IRemoteTransport for LoopbackTransport {
    async fn upsert(&self, request: &UpsertRequest) -> Result<UpsertResponse, BackendError> {
        self.enter().await?;
        let mut ns = self.namespaces.entry(request.namespace.clone()).or_default();
        for record in &request.vectors {
            ns.insert(record.id.clone(), record.clone());
        }
        Ok(UpsertResponse {
            upserted_count: request.vectors.len(),
        })
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, BackendError> {
        self.enter().await?;
        let Some(ns) = self.namespaces.get(&request.namespace) else {
            return Ok(QueryResponse::default());
        };
        let mut matches: Vec<QueryMatch> = ns
            .values()
            .filter(|r| filter::evaluate(&request.filter, &r.metadata))
            .map(|r| QueryMatch {
                id: r.id.clone(),
                score: cosine_similarity(&request.vector, &r.values),
                metadata: request.include_metadata.then(|| r.metadata.clone()),
            })
            .collect();
        matches.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.id.cmp(&b.id)));
        matches.truncate(request.top_k);
        Ok(QueryResponse { matches })
    }

    async fn stats(&self, request: &StatsRequest) -> Result<StatsResponse, BackendError> {
        self.enter().await?;
        Ok(StatsResponse {
            vector_count: self
                .namespaces
                .get(&request.namespace)
                .map_or(0, |ns| ns.len()),
        })
    }
}
