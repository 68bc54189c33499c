//! Wire types for the hosted index API.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use citespine_core::models::{ChunkMetadata, FilterDimension};

/// Metadata key holding the effective date as a comparable `yyyymmdd` integer.
pub const EFFECTIVE_ORD_KEY: &str = "effective_ord";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertRequest {
    pub namespace: String,
    pub vectors: Vec<RemoteRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertResponse {
    pub upserted_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub namespace: String,
    pub vector: Vec<f32>,
    pub top_k: usize,
    pub filter: Value,
    pub include_metadata: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryMatch {
    pub id: String,
    pub score: f64,
    #[serde(default)]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub matches: Vec<QueryMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsRequest {
    pub namespace: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatsResponse {
    pub vector_count: usize,
}

pub fn effective_ord(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 10_000 + i64::from(date.month()) * 100 + i64::from(date.day())
}

pub fn metadata_to_remote(metadata: &ChunkMetadata) -> Map<String, Value> {
    let mut map = Map::new();
    for dimension in FilterDimension::ALL {
        map.insert(
            dimension.key().to_string(),
            Value::String(dimension.value_of(metadata).to_string()),
        );
    }
    map.insert("family_id".into(), Value::String(metadata.family_id.clone()));
    map.insert("version_id".into(), Value::String(metadata.version_id.clone()));
    map.insert(
        "effective_date".into(),
        Value::String(metadata.effective_date.format("%Y-%m-%d").to_string()),
    );
    map.insert(
        EFFECTIVE_ORD_KEY.into(),
        Value::from(effective_ord(metadata.effective_date)),
    );
    map
}

/// Rebuild chunk metadata from an echoed record. `None` if any field is
/// missing or malformed.
pub fn metadata_from_remote(map: &Map<String, Value>) -> Option<ChunkMetadata> {
    let text = |key: &str| map.get(key).and_then(Value::as_str).map(str::to_string);
    let effective_date = text("effective_date")
        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok())?;
    Some(ChunkMetadata {
        framework: text("framework")?,
        jurisdiction: text("jurisdiction")?,
        doc_type: text("doc_type")?,
        authority_level: text("authority_level")?,
        family_id: text("family_id")?,
        version_id: text("version_id")?,
        effective_date,
    })
}
