//! ParityEvaluator: the same query set through two backends.

use std::sync::Arc;

use tracing::{debug, info, warn};

use citespine_core::errors::CiteResult;
use citespine_core::models::{ParityQuery, ParityReport, QueryCoverage};
use citespine_core::traits::{IQueryEmbedder, IVectorStore};
use citespine_retrieval::RetrievalRouter;

use crate::stats::{aggregate, compare_top_k};

pub struct ParityEvaluator<E: IQueryEmbedder> {
    embedder: Arc<E>,
    top_k: usize,
    probes: usize,
}

impl<E: IQueryEmbedder> ParityEvaluator<E> {
    pub fn new(embedder: Arc<E>, top_k: usize, probes: usize) -> Self {
        Self {
            embedder,
            top_k: top_k.max(1),
            probes,
        }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Run every query through both routers.
    ///
    /// Filters are normalized and versions resolved once, through router
    /// `a`, and the same resolved predicate is handed to both backends, so
    /// any disagreement comes from the indexes alone. A query that fails on
    /// either side is listed under `failures` and left out of the aggregate.
    pub async fn evaluate<A, B>(
        &self,
        queries: &[ParityQuery],
        a: &RetrievalRouter<A>,
        b: &RetrievalRouter<B>,
    ) -> ParityReport
    where
        A: IVectorStore,
        B: IVectorStore,
    {
        let mut per_query = Vec::with_capacity(queries.len());
        let mut failures = Vec::new();

        for query in queries {
            match self.compare_one(query, a, b).await {
                Ok(coverage) => {
                    debug!(query_id = %query.id, coverage = coverage.coverage, "parity query compared");
                    per_query.push(coverage);
                }
                Err(e) => {
                    warn!(query_id = %query.id, error = %e, tag = e.tag(), "parity query failed");
                    failures.push((query.id.clone(), e.to_string()));
                }
            }
        }

        let aggregate = aggregate(&per_query);
        let disagreements: Vec<QueryCoverage> =
            per_query.iter().filter(|q| !q.agrees()).cloned().collect();

        let report = ParityReport {
            backend_a: a.identity(),
            backend_b: b.identity(),
            top_k: self.top_k,
            per_query,
            aggregate,
            disagreements,
            failures,
        };
        info!(
            backend_a = %report.backend_a,
            backend_b = %report.backend_b,
            queries = report.aggregate.query_count,
            failures = report.failures.len(),
            mean_coverage = report.aggregate.mean,
            p50 = report.aggregate.p50,
            "parity evaluation finished"
        );
        report
    }

    async fn compare_one<A, B>(
        &self,
        query: &ParityQuery,
        a: &RetrievalRouter<A>,
        b: &RetrievalRouter<B>,
    ) -> CiteResult<QueryCoverage>
    where
        A: IVectorStore,
        B: IVectorStore,
    {
        let predicate = a.resolve(&query.filters)?;
        let embedding = self.embedder.embed(&query.text).await?;

        let (from_a, from_b) = tokio::join!(
            a.query_resolved(&embedding, predicate.clone(), self.top_k, self.probes),
            b.query_resolved(&embedding, predicate, self.top_k, self.probes),
        );
        let ids_a = from_a?.chunk_ids();
        let ids_b = from_b?.chunk_ids();

        let overlap = compare_top_k(&ids_a, &ids_b, self.top_k);
        Ok(QueryCoverage {
            query_id: query.id.clone(),
            filters: query.filters.clone(),
            coverage: overlap.coverage,
            jaccard: overlap.jaccard,
            only_in_a: overlap.only_in_a,
            only_in_b: overlap.only_in_b,
        })
    }
}
