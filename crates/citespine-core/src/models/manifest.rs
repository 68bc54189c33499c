use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::FilterPredicate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Query,
    Generate,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Generate => "generate",
        }
    }
}

/// Which backend instance served a call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BackendIdentity {
    /// "local" or "remote".
    pub kind: String,
    /// Index/namespace or database identity.
    pub instance: String,
}

impl std::fmt::Display for BackendIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.instance)
    }
}

/// Everything needed to reissue a call bit-for-bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedInputs {
    pub query_text: String,
    pub predicate: FilterPredicate,
    /// Version ids resolved at call time.
    pub version_ids: Vec<String>,
    pub top_k: usize,
    pub probes: usize,
    /// Artifact schema for `generate` calls.
    pub schema: Option<String>,
}

/// Immutable record of one query or generate call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub operation: OperationKind,
    pub inputs: NormalizedInputs,
    pub backend: BackendIdentity,
    pub embedding_model: String,
    pub corpus_hash: String,
    pub retrieved_chunk_ids: Vec<String>,
    pub cited_chunk_ids: Vec<String>,
    /// Comparable text form of the output (answer text or serialized artifact).
    pub answer_text: String,
    pub output: serde_json::Value,
    pub output_hash: String,
    pub latency_ms: u64,
}

/// Result of replaying a manifest. Mismatches are data, not errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayReport {
    pub manifest_id: String,
    pub retrieval_identity: bool,
    pub answer_similarity: f64,
    pub similarity_threshold: f64,
    pub output_hash_match: bool,
    pub corpus_changed: bool,
    pub embedding_model_changed: bool,
    pub original_chunk_ids: Vec<String>,
    pub replayed_chunk_ids: Vec<String>,
    pub mismatches: Vec<String>,
    pub pass: bool,
}
