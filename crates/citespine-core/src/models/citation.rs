use serde::{Deserialize, Serialize};

use super::PageSpan;

/// Character offsets `[start, end)` into a chunk's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub start: usize,
    pub end: usize,
}

impl HighlightSpan {
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// True if the span lies within a text of `text_chars` characters.
    pub fn within(&self, text_chars: usize) -> bool {
        self.start < self.end && self.end <= text_chars
    }
}

/// A pointer from an emitted sentence or field back to its source passage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    pub chunk_id: String,
    pub section_path: String,
    pub page_span: PageSpan,
    pub highlights: Vec<HighlightSpan>,
    /// Normalized, length-capped display text.
    pub snippet: String,
}

/// One supported sentence of an answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claim {
    pub text: String,
    pub citations: Vec<Citation>,
    pub confidence: f64,
}
