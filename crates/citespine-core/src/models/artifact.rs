use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{HighlightSpan, PageSpan};

/// A named field and the cue text used to find evidence for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaField {
    pub name: String,
    pub cue: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactSchema {
    pub name: String,
    pub fields: Vec<SchemaField>,
}

/// Provenance of one filled field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceMapEntry {
    pub field: String,
    pub chunk_id: String,
    pub section_path: String,
    pub page_span: PageSpan,
    pub highlight: HighlightSpan,
    pub confidence: f64,
}

/// A field left empty, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldFlag {
    pub field: String,
    pub reason: String,
}

/// A schema instance. Every field is present; ungrounded fields are empty
/// strings with a matching flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilledArtifact {
    pub schema: String,
    pub fields: BTreeMap<String, String>,
    pub source_map: Vec<SourceMapEntry>,
    pub flags: Vec<FieldFlag>,
}

impl FilledArtifact {
    pub fn filled_count(&self) -> usize {
        self.fields.values().filter(|v| !v.is_empty()).count()
    }

    pub fn source_for(&self, field: &str) -> Option<&SourceMapEntry> {
        self.source_map.iter().find(|e| e.field == field)
    }

    pub fn is_flagged(&self, field: &str) -> bool {
        self.flags.iter().any(|f| f.field == field)
    }

    pub fn cited_chunk_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.source_map.iter().map(|e| e.chunk_id.clone()).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}
