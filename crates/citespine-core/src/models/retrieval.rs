use serde::{Deserialize, Serialize};

use super::ChunkMetadata;

/// A raw backend hit: id, cosine similarity, and the metadata the backend holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredChunk {
    pub chunk_id: String,
    pub score: f64,
    pub metadata: ChunkMetadata,
}

/// A ranked, predicate-checked retrieval result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalCandidate {
    pub chunk_id: String,
    pub score: f64,
    /// 1-based rank after deterministic ordering.
    pub rank: usize,
    pub predicate_pass: bool,
    pub metadata: ChunkMetadata,
}
