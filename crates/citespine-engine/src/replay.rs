//! Replay of recorded manifests.

use citespine_core::constants::MEMO_SCHEMA;
use citespine_core::errors::CiteResult;
use citespine_core::models::{OperationKind, ReplayReport, ResolvedPredicate};
use citespine_core::traits::{IChunkSource, IQueryEmbedder};
use citespine_manifest::{compare, ReplayObservation};
use citespine_observability::replay_span;
use citespine_observability::tracing_setup::events;
use tracing::Instrument;

use crate::generate::artifact_text;
use crate::runtime::{lock, CiteEngine};

impl CiteEngine {
    /// Reissue the recorded call with its exact normalized inputs and
    /// resolved versions against the backend that served it, then judge
    /// the result. Mismatches are reported, not raised; an unknown id fails
    /// before any backend work.
    pub async fn replay(&self, manifest_id: &str) -> CiteResult<ReplayReport> {
        let manifest = self.recorder.load(manifest_id)?;
        let router = self.router_named(&manifest.backend.kind)?;
        let inputs = &manifest.inputs;

        let replayed = async {
            let predicate = ResolvedPredicate {
                filters: inputs.predicate.clone(),
                version_ids: inputs.version_ids.iter().cloned().collect(),
            };
            let embedding = self.embedder.embed(&inputs.query_text).await?;
            let retrieval = router
                .query_resolved(&embedding, predicate, inputs.top_k, inputs.probes)
                .await?;
            let chunks = self.storage.get_chunks(&retrieval.chunk_ids())?;

            let (answer_text, output) = match manifest.operation {
                OperationKind::Query => {
                    let answer = self.composer.compose(&inputs.query_text, &retrieval.candidates, &chunks);
                    (answer.answer.clone(), serde_json::to_value(&answer)?)
                }
                OperationKind::Generate => {
                    let schema_name = inputs.schema.as_deref().unwrap_or(MEMO_SCHEMA);
                    let schema = self.schemas.get(schema_name)?;
                    let artifact = self.filler.fill(schema, &inputs.query_text, &retrieval.candidates, &chunks);
                    (artifact_text(&artifact)?, serde_json::to_value(&artifact)?)
                }
            };

            CiteResult::Ok(ReplayObservation {
                chunk_ids: retrieval.chunk_ids(),
                answer_text,
                output,
                corpus_hash: self.recorder.corpus_hash()?,
                embedding_model: self.embedder.model_id().to_string(),
            })
        }
        .instrument(replay_span!(manifest_id))
        .await;
        self.observe_outcome(&manifest.backend.kind, &replayed);

        let report = compare(&manifest, &replayed?, self.config.manifest.answer_similarity_threshold);
        events::replay_completed(
            &report.manifest_id,
            report.retrieval_identity,
            report.answer_similarity,
            report.pass,
        );
        lock(&self.metrics).requests.record_replay(report.pass);
        Ok(report)
    }
}
