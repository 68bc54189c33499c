//! Wraps query and generate calls and persists their manifests.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use citespine_core::errors::{CiteError, CiteResult};
use citespine_core::models::{BackendIdentity, Manifest, NormalizedInputs, OperationKind};
use citespine_core::traits::{IChunkSource, IManifestStore};

use crate::hashing::output_hash;

/// What a wrapped call reports back for its manifest, alongside its own
/// typed result.
#[derive(Debug, Clone)]
pub struct CallRecord<T> {
    pub value: T,
    pub inputs: NormalizedInputs,
    pub backend: BackendIdentity,
    pub retrieved_chunk_ids: Vec<String>,
    pub cited_chunk_ids: Vec<String>,
    pub answer_text: String,
    pub output: serde_json::Value,
}

pub struct ManifestRecorder {
    store: Arc<dyn IManifestStore>,
    chunks: Arc<dyn IChunkSource>,
}

impl ManifestRecorder {
    pub fn new(store: Arc<dyn IManifestStore>, chunks: Arc<dyn IChunkSource>) -> Self {
        Self { store, chunks }
    }

    pub fn store(&self) -> &Arc<dyn IManifestStore> {
        &self.store
    }

    /// Run `call` and persist its manifest.
    ///
    /// The corpus hash is taken before the call starts. Nothing is written
    /// when the call fails or when the returned future is dropped before
    /// completion.
    pub async fn record<T, F>(
        &self,
        operation: OperationKind,
        embedding_model: &str,
        call: F,
    ) -> CiteResult<(T, Manifest)>
    where
        F: Future<Output = CiteResult<CallRecord<T>>>,
    {
        let corpus_hash = self.chunks.corpus_hash()?;
        let started = Instant::now();
        let record = call.await?;
        let latency_ms = started.elapsed().as_millis() as u64;

        let manifest = Manifest {
            id: uuid::Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            operation,
            inputs: record.inputs,
            backend: record.backend,
            embedding_model: embedding_model.to_string(),
            corpus_hash,
            retrieved_chunk_ids: record.retrieved_chunk_ids,
            cited_chunk_ids: record.cited_chunk_ids,
            answer_text: record.answer_text,
            output_hash: output_hash(&record.output),
            output: record.output,
            latency_ms,
        };
        self.store.append(&manifest)?;

        tracing::debug!(manifest_id = %manifest.id, backend = %manifest.backend, "manifest appended");
        Ok((record.value, manifest))
    }

    /// Fetch a manifest, failing fast on an unknown id.
    pub fn load(&self, id: &str) -> CiteResult<Manifest> {
        self.store
            .get(id)?
            .ok_or_else(|| CiteError::ManifestNotFound { id: id.to_string() })
    }

    /// Current corpus hash, for replay comparison.
    pub fn corpus_hash(&self) -> CiteResult<String> {
        self.chunks.corpus_hash()
    }
}
