//! Response types of the engine's entry points.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use citespine_core::models::{AnswerOutcome, Citation, Claim, FieldFlag, SourceMapEntry};
use citespine_storage::queries::chunk_ops::UpsertOutcome;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryMetrics {
    pub latency_ms: u64,
    /// Backend identity, `kind:instance`.
    pub backend: String,
    pub candidates: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    pub outcome: AnswerOutcome,
    pub claims: Vec<Claim>,
    pub citations: Vec<Citation>,
    pub metrics: QueryMetrics,
    pub manifest_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub schema: String,
    /// Every schema field; ungrounded ones are empty strings.
    pub artifact: BTreeMap<String, String>,
    pub source_map: Vec<SourceMapEntry>,
    pub flags: Vec<FieldFlag>,
    pub metrics: QueryMetrics,
    pub manifest_id: String,
}

/// Result of ingesting one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestReceipt {
    pub chunk_id: String,
    pub outcome: UpsertOutcome,
    /// Whether the version table changed.
    pub version_registered: bool,
}
