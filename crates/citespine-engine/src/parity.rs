//! Cross-backend parity runs.

use citespine_core::config::BackendKind;
use citespine_core::errors::CiteResult;
use citespine_core::models::{ParityQuery, ParityReport};
use citespine_observability::parity_span;
use citespine_observability::tracing_setup::events;
use citespine_parity::ParityEvaluator;
use tracing::Instrument;

use crate::runtime::CiteEngine;

impl CiteEngine {
    /// Run `queries` through `backend_a` and `backend_b` at depth `top_k`
    /// (default `parity.top_k`). Read-only; nothing is recorded.
    pub async fn parity(
        &self,
        queries: &[ParityQuery],
        backend_a: BackendKind,
        backend_b: BackendKind,
        top_k: Option<usize>,
    ) -> CiteResult<ParityReport> {
        let top_k = top_k.unwrap_or(self.config.parity.top_k);
        let evaluator = ParityEvaluator::new(
            self.embedder.clone(),
            top_k,
            self.config.retrieval.default_probes,
        );

        let span = parity_span!(backend_a.as_str(), backend_b.as_str(), queries.len());
        let report = evaluator
            .evaluate(queries, self.router(backend_a), self.router(backend_b))
            .instrument(span)
            .await;

        events::parity_completed(
            &report.backend_a.to_string(),
            &report.backend_b.to_string(),
            report.aggregate.query_count,
            report.aggregate.mean,
            report.meets_floor(self.config.parity.coverage_floor),
        );
        Ok(report)
    }

    /// Whether `report` clears the configured coverage floor.
    pub fn parity_meets_floor(&self, report: &ParityReport) -> bool {
        report.meets_floor(self.config.parity.coverage_floor)
    }
}
