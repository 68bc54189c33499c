//! Grounded question answering.

use citespine_core::errors::{CiteError, CiteResult};
use citespine_core::models::{
    AnswerOutcome, BackendIdentity, Chunk, ComposedAnswer, NormalizedInputs, OperationKind, RawFilters,
};
use citespine_core::traits::{IChunkSource, IQueryEmbedder};
use citespine_manifest::CallRecord;
use citespine_observability::query_span;
use citespine_observability::tracing_setup::events;
use citespine_retrieval::{Retrieval, RetrievalRouter};
use citespine_vectorstore::VectorBackend;
use tracing::Instrument;

use crate::responses::{QueryMetrics, QueryResponse};
use crate::runtime::{lock, CiteEngine};

/// A retrieval with its candidates' chunk text loaded.
pub(crate) struct Hydrated {
    pub retrieval: Retrieval,
    pub chunks: Vec<Chunk>,
    pub backend: BackendIdentity,
    pub top_k: usize,
    pub probes: usize,
}

impl Hydrated {
    pub fn inputs(&self, query_text: &str, schema: Option<&str>) -> NormalizedInputs {
        NormalizedInputs {
            query_text: query_text.to_string(),
            predicate: self.retrieval.predicate.filters.clone(),
            version_ids: self.retrieval.predicate.version_ids.iter().cloned().collect(),
            top_k: self.top_k,
            probes: self.probes,
            schema: schema.map(str::to_string),
        }
    }
}

impl CiteEngine {
    /// Answer `text` from the corpus slice selected by `filters`. `top_k`
    /// and `probes` fall back to the configured defaults.
    pub async fn query(
        &self,
        text: &str,
        filters: &RawFilters,
        top_k: Option<usize>,
        probes: Option<usize>,
    ) -> CiteResult<QueryResponse> {
        let router = self.active_router();
        let backend = router.identity();
        let top_k = self.effective_top_k(top_k);
        let probes = probes.unwrap_or(self.config.retrieval.default_probes);

        let span = query_span!(top_k, backend);
        let recorded = self
            .recorder
            .record(OperationKind::Query, self.embedder.model_id(), async {
                let hydrated = self.retrieve(router, text, filters, top_k, probes).await?;
                let answer = self
                    .composer
                    .compose(text, &hydrated.retrieval.candidates, &hydrated.chunks);
                Ok::<_, CiteError>(CallRecord {
                    inputs: hydrated.inputs(text, None),
                    backend: hydrated.backend.clone(),
                    retrieved_chunk_ids: hydrated.retrieval.chunk_ids(),
                    cited_chunk_ids: answer.cited_chunk_ids(),
                    answer_text: answer.answer.clone(),
                    output: serde_json::to_value(&answer)?,
                    value: (answer, hydrated.retrieval.candidates.len()),
                })
            })
            .instrument(span)
            .await;
        self.observe_outcome(&backend.kind, &recorded);

        let ((answer, candidates), manifest) = recorded?;
        events::manifest_recorded(&manifest.id, OperationKind::Query.as_str(), manifest.latency_ms);
        self.record_latency(OperationKind::Query.as_str(), manifest.latency_ms);
        lock(&self.metrics)
            .requests
            .record_query(answer.outcome == AnswerOutcome::Grounded, candidates);

        let ComposedAnswer {
            outcome,
            answer,
            claims,
            citations,
            ..
        } = answer;
        Ok(QueryResponse {
            answer,
            outcome,
            claims,
            citations,
            metrics: QueryMetrics {
                latency_ms: manifest.latency_ms,
                backend: manifest.backend.to_string(),
                candidates,
            },
            manifest_id: manifest.id,
        })
    }

    pub(crate) fn effective_top_k(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.config.retrieval.default_top_k)
            .min(self.config.retrieval.max_top_k)
    }

    /// Embed, retrieve through `router`, and load the candidates' chunks.
    pub(crate) async fn retrieve(
        &self,
        router: &RetrievalRouter<VectorBackend>,
        text: &str,
        filters: &RawFilters,
        top_k: usize,
        probes: usize,
    ) -> CiteResult<Hydrated> {
        // Filters are checked before any embedding or backend work.
        let predicate = router.resolve(filters)?;
        let embedding = self.embedder.embed(text).await?;
        let retrieval = router.query_resolved(&embedding, predicate, top_k, probes).await?;
        let chunks = self.storage.get_chunks(&retrieval.chunk_ids())?;
        Ok(Hydrated {
            retrieval,
            chunks,
            backend: router.identity(),
            top_k,
            probes,
        })
    }
}
