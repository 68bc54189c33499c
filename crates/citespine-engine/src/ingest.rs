//! Write path for the ingestion collaborator.

use citespine_core::config::BackendKind;
use citespine_core::errors::{CiteError, CiteResult};
use citespine_core::models::{Chunk, ChunkMetadata, DocumentVersion, FilterDimension, IngestRecord};
use citespine_core::traits::IVectorStore;
use citespine_observability::ingest_span;
use tracing::Instrument;

use crate::responses::IngestReceipt;
use crate::runtime::CiteEngine;

impl CiteEngine {
    /// Store one embedded chunk: chunk table, version table, and both vector
    /// indexes. Re-ingesting identical content changes nothing.
    ///
    /// The version is published to readers only after every write has
    /// landed. If a vector upsert fails part way, the version stays
    /// unpublished and ingesting the same record again completes it.
    pub async fn ingest(&self, record: IngestRecord) -> CiteResult<IngestReceipt> {
        let chunk_id = record.resolved_chunk_id();
        let span = ingest_span!(chunk_id);
        async move {
            let metadata = self.validate(&chunk_id, &record)?;

            let version = DocumentVersion {
                family_id: metadata.family_id.clone(),
                version_id: metadata.version_id.clone(),
                effective_date: metadata.effective_date,
                superseded_by: record.superseded_by.clone(),
            };
            let chunk = Chunk {
                id: chunk_id.clone(),
                token_count: record
                    .token_count
                    .unwrap_or_else(|| Chunk::estimate_tokens(&record.text)),
                content_hash: Chunk::content_hash_of(&record.text),
                text: record.text,
                section_path: record.section_path,
                page_span: record.page_span,
                metadata: metadata.clone(),
            };

            self.versions.check(&version)?;
            let outcome = self.storage.ingest_chunk(&chunk, &version)?;

            for kind in [BackendKind::Local, BackendKind::Remote] {
                self.backend(kind)
                    .upsert(&chunk_id, &record.embedding, &metadata)
                    .await?;
            }
            let version_registered = self.versions.register(version)?;

            tracing::debug!(?outcome, version_registered, "chunk ingested");
            Ok(IngestReceipt {
                chunk_id,
                outcome,
                version_registered,
            })
        }
        .instrument(span)
        .await
    }

    /// Check the record and return its metadata with every filterable value
    /// mapped to its vocabulary canonical.
    fn validate(&self, chunk_id: &str, record: &IngestRecord) -> CiteResult<ChunkMetadata> {
        let invalid = |reason: String| CiteError::InvalidRecord {
            chunk_id: chunk_id.to_string(),
            reason,
        };

        if record.text.trim().is_empty() {
            return Err(invalid("empty text".into()));
        }
        let dimensions = self.config.embedding.dimensions;
        if record.embedding.len() != dimensions {
            return Err(invalid(format!(
                "embedding has {} dimensions, expected {dimensions}",
                record.embedding.len()
            )));
        }
        if record.embedding.iter().any(|v| !v.is_finite()) {
            return Err(invalid("embedding contains non-finite values".into()));
        }
        if record.metadata.family_id.trim().is_empty() || record.metadata.version_id.trim().is_empty() {
            return Err(invalid("family_id and version_id are required".into()));
        }

        let vocabulary = self.local.normalizer().vocabulary();
        let mut metadata = record.metadata.clone();
        for dimension in FilterDimension::ALL {
            let raw = dimension.value_of(&record.metadata);
            let canonical = vocabulary
                .canonicalize(dimension, raw)
                .ok_or_else(|| invalid(format!("{} value {raw:?} is not in the vocabulary", dimension.key())))?;
            let slot = match dimension {
                FilterDimension::Framework => &mut metadata.framework,
                FilterDimension::Jurisdiction => &mut metadata.jurisdiction,
                FilterDimension::DocType => &mut metadata.doc_type,
                FilterDimension::AuthorityLevel => &mut metadata.authority_level,
            };
            *slot = canonical.to_string();
        }
        Ok(metadata)
    }
}
