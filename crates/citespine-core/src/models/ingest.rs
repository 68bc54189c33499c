use serde::{Deserialize, Serialize};

use super::{ChunkMetadata, PageSpan};

/// One chunk handed over by the ingestion pipeline, already embedded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IngestRecord {
    /// Derived from content when absent.
    #[serde(default)]
    pub chunk_id: Option<String>,
    pub text: String,
    pub section_path: String,
    pub page_span: PageSpan,
    pub metadata: ChunkMetadata,
    #[serde(default)]
    pub superseded_by: Option<String>,
    pub embedding: Vec<f32>,
    #[serde(default)]
    pub token_count: Option<usize>,
}

impl IngestRecord {
    pub fn resolved_chunk_id(&self) -> String {
        self.chunk_id.clone().unwrap_or_else(|| {
            super::Chunk::derive_id(
                &self.metadata.family_id,
                &self.metadata.version_id,
                &self.section_path,
                &self.text,
            )
        })
    }
}
