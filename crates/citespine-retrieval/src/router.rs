//! RetrievalRouter: normalize → resolve versions → restrict → backend → rank.
//!
//! The router owns the failure policy for backend calls. Each attempt holds
//! a semaphore permit and runs under a timeout; transient failures are
//! retried with capped exponential backoff, after which the call fails with
//! `DegradedService`. The router never falls back to another backend.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, warn, Instrument};

use citespine_core::config::RouterConfig;
use citespine_core::errors::{BackendError, CiteError, CiteResult};
use citespine_core::models::{
    BackendIdentity, FilterPredicate, RawFilters, ResolvedPredicate, RetrievalCandidate, ScoredChunk,
};
use citespine_core::traits::IVectorStore;
use citespine_observability::backend_span;
use citespine_observability::tracing_setup::events;
use citespine_temporal::VersionRegistry;

use crate::normalizer::FilterNormalizer;
use crate::ranking::rank_candidates;

/// Candidates plus the predicate that produced them.
#[derive(Debug, Clone)]
pub struct Retrieval {
    pub predicate: ResolvedPredicate,
    pub candidates: Vec<RetrievalCandidate>,
    /// Backend attempts made, including the successful one.
    pub attempts: u32,
}

impl Retrieval {
    pub fn chunk_ids(&self) -> Vec<String> {
        self.candidates.iter().map(|c| c.chunk_id.clone()).collect()
    }
}

pub struct RetrievalRouter<S: IVectorStore> {
    backend: Arc<S>,
    normalizer: Arc<FilterNormalizer>,
    versions: Arc<VersionRegistry>,
    config: RouterConfig,
    max_top_k: usize,
    permits: Arc<Semaphore>,
}

impl<S: IVectorStore> RetrievalRouter<S> {
    pub fn new(
        backend: Arc<S>,
        normalizer: Arc<FilterNormalizer>,
        versions: Arc<VersionRegistry>,
        config: RouterConfig,
    ) -> Self {
        let permits = Arc::new(Semaphore::new(config.max_in_flight.max(1)));
        Self {
            backend,
            normalizer,
            versions,
            config,
            max_top_k: usize::MAX,
            permits,
        }
    }

    /// Clamp every requested top-k to `max_top_k`.
    pub fn with_max_top_k(mut self, max_top_k: usize) -> Self {
        self.max_top_k = max_top_k.max(1);
        self
    }

    pub fn backend(&self) -> &Arc<S> {
        &self.backend
    }

    pub fn identity(&self) -> BackendIdentity {
        self.backend.identity()
    }

    pub fn normalizer(&self) -> &FilterNormalizer {
        &self.normalizer
    }

    /// Ranked candidates for `embedding` under the caller's raw filters.
    pub async fn query(
        &self,
        embedding: &[f32],
        filters: &RawFilters,
        top_k: usize,
        probes: usize,
    ) -> CiteResult<Vec<RetrievalCandidate>> {
        Ok(self.retrieve(embedding, filters, top_k, probes).await?.candidates)
    }

    /// Like [`query`](Self::query), also returning the resolved predicate.
    pub async fn retrieve(
        &self,
        embedding: &[f32],
        filters: &RawFilters,
        top_k: usize,
        probes: usize,
    ) -> CiteResult<Retrieval> {
        let predicate = self.resolve(filters)?;
        self.query_resolved(embedding, predicate, top_k, probes).await
    }

    /// Normalize `filters` and restrict them to the versions effective at
    /// their as-of date, without touching the backend.
    pub fn resolve(&self, filters: &RawFilters) -> CiteResult<ResolvedPredicate> {
        let predicate = self.normalizer.normalize(filters)?;
        Ok(self.versions.snapshot().restrict(predicate))
    }

    /// Re-enter with an already canonical predicate; versions are resolved
    /// against the current table.
    pub async fn query_normalized(
        &self,
        embedding: &[f32],
        predicate: FilterPredicate,
        top_k: usize,
        probes: usize,
    ) -> CiteResult<Retrieval> {
        let resolved = self.versions.snapshot().restrict(predicate);
        self.query_resolved(embedding, resolved, top_k, probes).await
    }

    /// Run an exact resolved predicate, e.g. one recorded in a manifest.
    pub async fn query_resolved(
        &self,
        embedding: &[f32],
        predicate: ResolvedPredicate,
        top_k: usize,
        probes: usize,
    ) -> CiteResult<Retrieval> {
        let top_k = top_k.min(self.max_top_k);
        if predicate.is_empty() || top_k == 0 {
            debug!(as_of = %predicate.filters.as_of, "no eligible versions, skipping backend");
            return Ok(Retrieval {
                predicate,
                candidates: Vec::new(),
                attempts: 0,
            });
        }

        let (hits, attempts) = self.call_backend(embedding, &predicate, top_k, probes).await?;
        let backend = self.backend.identity();
        let candidates = rank_candidates(hits, &predicate, top_k, &backend.kind)?;
        debug!(backend = %backend, top_k, probes, "candidates ranked");
        events::candidates_retrieved(&backend.kind, candidates.len(), attempts);
        Ok(Retrieval {
            predicate,
            candidates,
            attempts,
        })
    }

    async fn call_backend(
        &self,
        embedding: &[f32],
        predicate: &ResolvedPredicate,
        top_k: usize,
        probes: usize,
    ) -> CiteResult<(Vec<ScoredChunk>, u32)> {
        let kind = self.backend.identity().kind;
        let max_attempts = self.config.max_attempts.max(1);
        let timeout = Duration::from_millis(self.config.timeout_ms);
        let mut last_error: Option<BackendError> = None;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                let delay = self.config.backoff_ms(attempt - 1);
                tokio::time::sleep(Duration::from_millis(delay)).await;
            }

            let outcome = {
                let _permit = self.permits.acquire().await.map_err(|_| CiteError::DegradedService {
                    backend: kind.clone(),
                    attempts: attempt - 1,
                    last_error: "router shut down".to_string(),
                })?;
                tokio::time::timeout(timeout, self.backend.query(embedding, predicate, top_k, probes))
                    .instrument(backend_span!(kind, attempt))
                    .await
            };

            let error = match outcome {
                Ok(Ok(hits)) => return Ok((hits, attempt)),
                Ok(Err(e)) if !e.is_transient() => return Err(e.into()),
                Ok(Err(e)) => e,
                Err(_) => BackendError::Timeout {
                    backend: kind.clone(),
                    timeout_ms: self.config.timeout_ms,
                },
            };
            if attempt < max_attempts {
                events::backend_retry(&kind, attempt, &error.to_string());
            } else {
                warn!(backend = %kind, attempt, max_attempts, error = %error, "backend retries exhausted");
            }
            last_error = Some(error);
        }

        Err(CiteError::DegradedService {
            backend: kind,
            attempts: max_attempts,
            last_error: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }
}
