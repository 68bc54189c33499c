//! Supportable spans cut from candidate chunks.

use citespine_core::constants::MAX_CITATION_SNIPPET_CHARS;
use citespine_core::models::{Chunk, Citation, HighlightSpan, RetrievalCandidate};

use crate::sentences::split_sentences;

/// One sentence of a candidate chunk, with everything needed to cite it.
#[derive(Debug, Clone)]
pub struct EvidenceSpan<'a> {
    pub chunk: &'a Chunk,
    /// 1-based rank of the candidate the chunk came from.
    pub rank: usize,
    /// Sentence index within the chunk.
    pub position: usize,
    pub text: String,
    pub highlight: HighlightSpan,
}

impl EvidenceSpan<'_> {
    pub fn citation(&self) -> Citation {
        Citation {
            chunk_id: self.chunk.id.clone(),
            section_path: self.chunk.section_path.clone(),
            page_span: self.chunk.page_span,
            highlights: vec![self.highlight],
            snippet: normalize_snippet(&self.text),
        }
    }
}

/// Sentences of every candidate whose chunk is in `chunks`, in rank order.
/// Chunks not among the candidates are ignored.
pub fn collect_spans<'a>(candidates: &[RetrievalCandidate], chunks: &'a [Chunk]) -> Vec<EvidenceSpan<'a>> {
    let mut spans = Vec::new();
    for candidate in candidates {
        let Some(chunk) = chunks.iter().find(|c| c.id == candidate.chunk_id) else {
            continue;
        };
        for (position, sentence) in split_sentences(&chunk.text).into_iter().enumerate() {
            spans.push(EvidenceSpan {
                chunk,
                rank: candidate.rank,
                position,
                highlight: HighlightSpan {
                    start: sentence.start,
                    end: sentence.end,
                },
                text: sentence.text,
            });
        }
    }
    spans
}

/// Collapse whitespace and cap at `MAX_CITATION_SNIPPET_CHARS` characters,
/// ending in an ellipsis when cut.
pub fn normalize_snippet(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= MAX_CITATION_SNIPPET_CHARS {
        return collapsed;
    }
    let mut cut: String = collapsed
        .chars()
        .take(MAX_CITATION_SNIPPET_CHARS - 1)
        .collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}
