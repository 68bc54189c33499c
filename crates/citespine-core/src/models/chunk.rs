use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Inclusive page range a chunk was extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpan {
    pub start: u32,
    pub end: u32,
}

impl PageSpan {
    pub fn new(start: u32, end: u32) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    /// Renders as `p. 4` or `pp. 4-6`.
    pub fn label(&self) -> String {
        if self.start == self.end {
            format!("p. {}", self.start)
        } else {
            format!("pp. {}-{}", self.start, self.end)
        }
    }
}

/// Filterable metadata carried by every chunk and echoed by backends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub framework: String,
    pub jurisdiction: String,
    pub doc_type: String,
    pub authority_level: String,
    pub family_id: String,
    pub version_id: String,
    pub effective_date: NaiveDate,
}

/// A retrievable passage of a document version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub text: String,
    pub section_path: String,
    pub page_span: PageSpan,
    pub metadata: ChunkMetadata,
    pub token_count: usize,
    /// blake3 hex of `text`.
    pub content_hash: String,
}

impl Chunk {
    /// Content-derived id: identical content in the same document version
    /// always yields the same id.
    pub fn derive_id(family_id: &str, version_id: &str, section_path: &str, text: &str) -> String {
        let mut hasher = blake3::Hasher::new();
        for part in [family_id, version_id, section_path, text] {
            hasher.update(part.as_bytes());
            hasher.update(&[0x1f]);
        }
        hasher.finalize().to_hex()[..32].to_string()
    }

    pub fn content_hash_of(text: &str) -> String {
        blake3::hash(text.as_bytes()).to_hex().to_string()
    }

    /// Whitespace-approximate token count used when ingestion supplies none.
    pub fn estimate_tokens(text: &str) -> usize {
        text.split_whitespace().count()
    }
}
