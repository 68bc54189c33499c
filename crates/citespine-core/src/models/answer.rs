use serde::{Deserialize, Serialize};

use super::{Citation, Claim};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerOutcome {
    Grounded,
    /// Nothing cleared the entailment threshold. Not an error.
    NoEvidence,
}

/// Output of the evidence composer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComposedAnswer {
    pub outcome: AnswerOutcome,
    /// Rendered answer with `[n]` markers referring to `citations`.
    pub answer: String,
    pub claims: Vec<Claim>,
    /// Distinct citations in first-use order.
    pub citations: Vec<Citation>,
    /// Whether the optional rewriter's phrasing was accepted.
    pub rewritten: bool,
}

impl ComposedAnswer {
    pub fn no_evidence() -> Self {
        Self {
            outcome: AnswerOutcome::NoEvidence,
            answer: crate::constants::NO_EVIDENCE_ANSWER.to_string(),
            claims: Vec::new(),
            citations: Vec::new(),
            rewritten: false,
        }
    }

    pub fn cited_chunk_ids(&self) -> Vec<String> {
        self.citations.iter().map(|c| c.chunk_id.clone()).collect()
    }
}
