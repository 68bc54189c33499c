//! EvidenceComposer: extractive, citation-carrying answers.
//!
//! Every candidate sentence is a potential support span. A span qualifies
//! when it scores at least the threshold against the question; the best
//! qualifying spans become claims, each re-checked against the span it
//! cites. With nothing qualifying the composer returns the no-evidence
//! outcome instead of an answer.

use std::sync::Arc;

use tracing::debug;

use citespine_core::models::{AnswerOutcome, Chunk, Citation, Claim, ComposedAnswer, RetrievalCandidate};
use citespine_core::traits::{IAnswerRewriter, IEvidenceScorer};

use crate::evidence::{collect_spans, EvidenceSpan};

pub struct EvidenceComposer {
    scorer: Arc<dyn IEvidenceScorer>,
    rewriter: Option<Arc<dyn IAnswerRewriter>>,
    threshold: f64,
    max_claims: usize,
}

/// A claim under construction: text plus the spans it cites.
struct Draft<'a> {
    text: String,
    spans: Vec<EvidenceSpan<'a>>,
    relevance: f64,
}

impl EvidenceComposer {
    pub fn new(scorer: Arc<dyn IEvidenceScorer>, threshold: f64, max_claims: usize) -> Self {
        Self {
            scorer,
            rewriter: None,
            threshold,
            max_claims: max_claims.max(1),
        }
    }

    pub fn with_rewriter(mut self, rewriter: Arc<dyn IAnswerRewriter>) -> Self {
        self.rewriter = Some(rewriter);
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Compose an answer to `question` from `candidates`, reading text from
    /// `chunks`. Citations only ever point at chunks among the candidates.
    pub fn compose(&self, question: &str, candidates: &[RetrievalCandidate], chunks: &[Chunk]) -> ComposedAnswer {
        let mut drafts: Vec<Draft<'_>> = Vec::new();
        for span in collect_spans(candidates, chunks) {
            let relevance = self.scorer.score(question, &span.text);
            if relevance < self.threshold {
                continue;
            }
            // Identical sentences from different chunks become one claim
            // citing each of them.
            match drafts.iter_mut().find(|d| d.text == span.text) {
                Some(draft) => {
                    draft.relevance = draft.relevance.max(relevance);
                    if !draft.spans.iter().any(|s| s.chunk.id == span.chunk.id) {
                        draft.spans.push(span);
                    }
                }
                None => drafts.push(Draft {
                    text: span.text.clone(),
                    spans: vec![span],
                    relevance,
                }),
            }
        }

        // Best support first, then retrieval order.
        drafts.sort_by(|a, b| {
            b.relevance
                .total_cmp(&a.relevance)
                .then_with(|| first_position(a).cmp(&first_position(b)))
        });
        drafts.truncate(self.max_claims);
        // Present in reading order.
        drafts.sort_by_key(first_position);

        let mut claims: Vec<Claim> = drafts
            .iter()
            .filter_map(|d| self.claim(&d.text, &d.spans))
            .collect();

        if claims.is_empty() {
            debug!(
                candidates = candidates.len(),
                threshold = self.threshold,
                "no span cleared the threshold"
            );
            return ComposedAnswer::no_evidence();
        }

        let rewritten = self.try_rewrite(question, &mut claims, &drafts);
        render(claims, rewritten)
    }

    /// A claim citing `spans`, or `None` if any span fails to support it.
    fn claim(&self, text: &str, spans: &[EvidenceSpan<'_>]) -> Option<Claim> {
        let confidence = spans
            .iter()
            .map(|s| self.scorer.score(text, &s.text))
            .fold(f64::INFINITY, f64::min);
        (confidence.is_finite() && confidence >= self.threshold).then(|| Claim {
            text: text.to_string(),
            citations: spans.iter().map(EvidenceSpan::citation).collect(),
            confidence,
        })
    }

    /// Accept the rewriter's phrasing only if it keeps one sentence per
    /// claim and every sentence is still supported by its cited spans.
    fn try_rewrite(&self, question: &str, claims: &mut [Claim], drafts: &[Draft<'_>]) -> bool {
        let Some(rewriter) = &self.rewriter else {
            return false;
        };
        let extractive: Vec<String> = claims.iter().map(|c| c.text.clone()).collect();
        let rewritten = match rewriter.rewrite(question, &extractive) {
            Ok(r) if r.len() == claims.len() => r,
            Ok(r) => {
                debug!(expected = claims.len(), got = r.len(), "rewrite changed sentence count, keeping extractive text");
                return false;
            }
            Err(e) => {
                debug!(error = %e, "rewrite failed, keeping extractive text");
                return false;
            }
        };

        let mut checked = Vec::with_capacity(claims.len());
        for (claim, sentence) in claims.iter().zip(&rewritten) {
            let Some(draft) = drafts.iter().find(|d| d.text == claim.text) else {
                return false;
            };
            match self.claim(sentence, &draft.spans) {
                Some(c) => checked.push(c),
                None => {
                    debug!(sentence = %sentence, "rewritten sentence lost support, keeping extractive text");
                    return false;
                }
            }
        }
        claims.clone_from_slice(&checked);
        true
    }
}

fn first_position(draft: &Draft<'_>) -> (usize, usize) {
    draft
        .spans
        .first()
        .map_or((usize::MAX, usize::MAX), |s| (s.rank, s.position))
}

/// Number distinct citations in first-use order and render `[n]` markers.
fn render(claims: Vec<Claim>, rewritten: bool) -> ComposedAnswer {
    let mut citations: Vec<Citation> = Vec::new();
    let mut sentences = Vec::with_capacity(claims.len());
    for claim in &claims {
        let mut markers = String::new();
        for citation in &claim.citations {
            let index = match citations.iter().position(|c| c.chunk_id == citation.chunk_id) {
                Some(i) => {
                    let merged = &mut citations[i];
                    for h in &citation.highlights {
                        if !merged.highlights.contains(h) {
                            merged.highlights.push(*h);
                        }
                    }
                    i
                }
                None => {
                    citations.push(citation.clone());
                    citations.len() - 1
                }
            };
            markers.push_str(&format!("[{}]", index + 1));
        }
        sentences.push(format!("{} {markers}", claim.text));
    }
    for c in &mut citations {
        c.highlights.sort_by_key(|h| h.start);
    }

    ComposedAnswer {
        outcome: AnswerOutcome::Grounded,
        answer: sentences.join(" "),
        claims,
        citations,
        rewritten,
    }
}
