use crate::errors::CiteResult;

/// Entailment-style support score.
pub trait IEvidenceScorer: Send + Sync {
    /// How strongly `span` supports `claim`, in `[0, 1]`.
    fn score(&self, claim: &str, span: &str) -> f64;

    fn name(&self) -> &str;
}

/// Optional phrasing pass over extractive sentences.
///
/// Must return exactly one sentence per input sentence; the composer
/// re-verifies each rewritten sentence against its original citations.
pub trait IAnswerRewriter: Send + Sync {
    fn rewrite(&self, question: &str, sentences: &[String]) -> CiteResult<Vec<String>>;
}
