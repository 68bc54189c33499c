//! ArtifactFiller: one grounded sentence per schema field, or an empty,
//! flagged field.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use tracing::debug;

use citespine_core::constants::UNGROUNDED_FLAG;
use citespine_core::models::{
    ArtifactSchema, Chunk, FieldFlag, FilledArtifact, RetrievalCandidate, SourceMapEntry,
};
use citespine_core::traits::IEvidenceScorer;

use crate::evidence::collect_spans;

/// Placeholder in field cues replaced by the request text.
pub const QUESTION_PLACEHOLDER: &str = "{question}";

pub struct ArtifactFiller {
    scorer: Arc<dyn IEvidenceScorer>,
    threshold: f64,
}

impl ArtifactFiller {
    pub fn new(scorer: Arc<dyn IEvidenceScorer>, threshold: f64) -> Self {
        Self { scorer, threshold }
    }

    /// Fill `schema` for `question`. Fields are grounded independently in
    /// schema order; a span already used by an earlier field is not reused.
    pub fn fill(
        &self,
        schema: &ArtifactSchema,
        question: &str,
        candidates: &[RetrievalCandidate],
        chunks: &[Chunk],
    ) -> FilledArtifact {
        let spans = collect_spans(candidates, chunks);
        let mut used: HashSet<(String, usize)> = HashSet::new();
        let mut fields = BTreeMap::new();
        let mut source_map = Vec::new();
        let mut flags = Vec::new();

        for field in &schema.fields {
            let cue = field.cue.replace(QUESTION_PLACEHOLDER, question);
            let best = spans
                .iter()
                .filter(|s| !used.contains(&(s.chunk.id.clone(), s.position)))
                .map(|s| (s, self.scorer.score(&cue, &s.text)))
                .filter(|(_, score)| *score >= self.threshold)
                .max_by(|(a, sa), (b, sb)| {
                    sa.total_cmp(sb)
                        .then_with(|| (b.rank, b.position).cmp(&(a.rank, a.position)))
                });

            match best {
                Some((span, confidence)) => {
                    used.insert((span.chunk.id.clone(), span.position));
                    fields.insert(field.name.clone(), span.text.clone());
                    source_map.push(SourceMapEntry {
                        field: field.name.clone(),
                        chunk_id: span.chunk.id.clone(),
                        section_path: span.chunk.section_path.clone(),
                        page_span: span.chunk.page_span,
                        highlight: span.highlight,
                        confidence,
                    });
                }
                None => {
                    fields.insert(field.name.clone(), String::new());
                    flags.push(FieldFlag {
                        field: field.name.clone(),
                        reason: UNGROUNDED_FLAG.to_string(),
                    });
                }
            }
        }

        debug!(
            schema = %schema.name,
            filled = source_map.len(),
            flagged = flags.len(),
            "artifact filled"
        );
        FilledArtifact {
            schema: schema.name.clone(),
            fields,
            source_map,
            flags,
        }
    }
}
