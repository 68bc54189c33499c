use citespine_core::traits::IEvidenceScorer;

use crate::terms::content_terms;

/// Share of the claim's content terms that also occur in the span.
///
/// `1.0` when every content term of the claim is present, `0.0` when the
/// claim has no content terms at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalEntailmentScorer;

impl LexicalEntailmentScorer {
    pub fn new() -> Self {
        Self
    }
}

impl IEvidenceScorer for LexicalEntailmentScorer {
    fn score(&self, claim: &str, span: &str) -> f64 {
        let claim_terms = content_terms(claim);
        if claim_terms.is_empty() {
            return 0.0;
        }
        let span_terms = content_terms(span);
        let supported = claim_terms.intersection(&span_terms).count();
        supported as f64 / claim_terms.len() as f64
    }

    fn name(&self) -> &str {
        "lexical-entailment"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_and_partial_support() {
        let s = LexicalEntailmentScorer::new();
        let span = "A lessee shall recognise a right-of-use asset and a lease liability.";
        assert_eq!(s.score("How does a lessee recognize a lease liability?", span), 1.0);
        let partial = s.score("lessee discount rate", span);
        assert!((partial - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(s.score("What is the capital of France?", span), 0.0);
    }

    #[test]
    fn empty_claim_scores_zero() {
        let s = LexicalEntailmentScorer::new();
        assert_eq!(s.score("", "anything"), 0.0);
        assert_eq!(s.score("the of and", "the of and"), 0.0);
    }
}
