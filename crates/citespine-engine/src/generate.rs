//! Schema-driven artifact generation.

use citespine_core::errors::{CiteError, CiteResult};
use citespine_core::models::{FilledArtifact, OperationKind, RawFilters};
use citespine_core::traits::IQueryEmbedder;
use citespine_manifest::CallRecord;
use citespine_observability::generate_span;
use citespine_observability::tracing_setup::events;
use tracing::Instrument;

use crate::responses::{GenerateResponse, QueryMetrics};
use crate::runtime::{lock, CiteEngine};

impl CiteEngine {
    /// Fill the artifact schema `schema_name` for `text`. An unknown schema
    /// fails before any retrieval.
    pub async fn generate(
        &self,
        schema_name: &str,
        text: &str,
        filters: &RawFilters,
    ) -> CiteResult<GenerateResponse> {
        let schema = self.schemas.get(schema_name)?;
        let router = self.active_router();
        let backend = router.identity();
        let top_k = self.effective_top_k(None);
        let probes = self.config.retrieval.default_probes;

        let span = generate_span!(schema_name, backend);
        let recorded = self
            .recorder
            .record(OperationKind::Generate, self.embedder.model_id(), async {
                let hydrated = self.retrieve(router, text, filters, top_k, probes).await?;
                let artifact = self
                    .filler
                    .fill(schema, text, &hydrated.retrieval.candidates, &hydrated.chunks);
                Ok::<_, CiteError>(CallRecord {
                    inputs: hydrated.inputs(text, Some(schema_name)),
                    backend: hydrated.backend.clone(),
                    retrieved_chunk_ids: hydrated.retrieval.chunk_ids(),
                    cited_chunk_ids: artifact.cited_chunk_ids(),
                    answer_text: artifact_text(&artifact)?,
                    output: serde_json::to_value(&artifact)?,
                    value: (artifact, hydrated.retrieval.candidates.len()),
                })
            })
            .instrument(span)
            .await;
        self.observe_outcome(&backend.kind, &recorded);

        let ((artifact, candidates), manifest) = recorded?;
        events::manifest_recorded(&manifest.id, OperationKind::Generate.as_str(), manifest.latency_ms);
        self.record_latency(OperationKind::Generate.as_str(), manifest.latency_ms);
        lock(&self.metrics)
            .requests
            .record_generate(artifact.flags.len(), candidates);

        Ok(GenerateResponse {
            schema: artifact.schema,
            artifact: artifact.fields,
            source_map: artifact.source_map,
            flags: artifact.flags,
            metrics: QueryMetrics {
                latency_ms: manifest.latency_ms,
                backend: manifest.backend.to_string(),
                candidates,
            },
            manifest_id: manifest.id,
        })
    }
}

/// Comparable text form of an artifact: its fields as JSON, keys sorted.
pub(crate) fn artifact_text(artifact: &FilledArtifact) -> CiteResult<String> {
    Ok(serde_json::to_string(&artifact.fields)?)
}
