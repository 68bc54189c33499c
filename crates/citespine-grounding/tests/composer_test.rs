mod common;

use std::collections::HashSet;
use std::sync::Arc;

use proptest::prelude::*;
use serde::Deserialize;

use citespine_core::constants::NO_EVIDENCE_ANSWER;
use citespine_core::errors::{CiteError, CiteResult};
use citespine_core::models::{AnswerOutcome, ComposedAnswer};
use citespine_core::traits::IAnswerRewriter;
use citespine_grounding::{EvidenceComposer, LexicalEntailmentScorer};
use common::{candidates_for, corpus_chunks, highlighted};

fn composer() -> EvidenceComposer {
    EvidenceComposer::new(Arc::new(LexicalEntailmentScorer::new()), 0.5, 5)
}

fn assert_well_cited(answer: &ComposedAnswer, allowed: &HashSet<String>) {
    let chunks = corpus_chunks();
    for claim in &answer.claims {
        assert!(!claim.citations.is_empty(), "uncited claim: {}", claim.text);
        assert!(claim.confidence >= 0.5);
        for citation in &claim.citations {
            assert!(allowed.contains(&citation.chunk_id));
            let chunk = chunks.iter().find(|c| c.id == citation.chunk_id).unwrap();
            let total = chunk.text.chars().count();
            for h in &citation.highlights {
                assert!(h.within(total));
            }
        }
    }
}

#[test]
fn grounded_answer_cites_its_sources() {
    let chunks = corpus_chunks();
    let candidates = candidates_for(&chunks);
    let answer = composer().compose("How does a lessee recognize a lease liability?", &candidates, &chunks);

    assert_eq!(answer.outcome, AnswerOutcome::Grounded);
    assert!(!answer.claims.is_empty());
    assert!(answer.answer.contains("[1]"));
    let allowed: HashSet<String> = candidates.iter().map(|c| c.chunk_id.clone()).collect();
    assert_well_cited(&answer, &allowed);

    // Extractive claims are exactly the highlighted text.
    for claim in &answer.claims {
        let c = &claim.citations[0];
        let chunk = chunks.iter().find(|ch| ch.id == c.chunk_id).unwrap();
        let h = c.highlights[0];
        assert_eq!(highlighted(chunk, h.start, h.end), claim.text);
    }
}

#[test]
fn claims_follow_retrieval_order_and_cap() {
    let chunks = corpus_chunks();
    let candidates = candidates_for(&chunks);
    let composer = EvidenceComposer::new(Arc::new(LexicalEntailmentScorer::new()), 0.5, 2);
    let answer = composer.compose("lease payments", &candidates, &chunks);
    assert_eq!(answer.claims.len(), 2);
    let rank_of = |id: &str| candidates.iter().find(|c| c.chunk_id == id).unwrap().rank;
    assert!(rank_of(&answer.claims[0].citations[0].chunk_id) <= rank_of(&answer.claims[1].citations[0].chunk_id));
}

#[derive(Deserialize)]
struct NoEvidence {
    queries: Vec<String>,
}

#[test]
fn unrelated_questions_get_the_guard_outcome() {
    let chunks = corpus_chunks();
    let candidates = candidates_for(&chunks);
    let golden: NoEvidence = test_fixtures::load_fixture("golden/grounding/no_evidence_queries.json");
    for q in &golden.queries {
        let answer = composer().compose(q, &candidates, &chunks);
        assert_eq!(answer.outcome, AnswerOutcome::NoEvidence, "{q}");
        assert_eq!(answer.answer, NO_EVIDENCE_ANSWER);
        assert!(answer.citations.is_empty());
        assert!(answer.claims.is_empty());
    }
}

#[test]
fn no_candidates_means_no_evidence() {
    let chunks = corpus_chunks();
    let answer = composer().compose("lease liability", &[], &chunks);
    assert_eq!(answer, ComposedAnswer::no_evidence());
}

#[test]
fn chunks_outside_the_candidate_set_are_never_cited() {
    let chunks = corpus_chunks();
    // Only the ESEF chunk is a candidate; the lease chunks are loaded but not retrieved.
    let esef: Vec<_> = chunks.iter().filter(|c| c.metadata.family_id == "esma-esef").cloned().collect();
    let candidates = candidates_for(&esef);
    let answer = composer().compose("lease liability present value", &candidates, &chunks);
    assert_eq!(answer.outcome, AnswerOutcome::NoEvidence);
}

struct PrefixRewriter;

impl IAnswerRewriter for PrefixRewriter {
    fn rewrite(&self, _question: &str, sentences: &[String]) -> CiteResult<Vec<String>> {
        Ok(sentences.iter().map(|s| format!("Notably, {s}")).collect())
    }
}

struct DroppingRewriter;

impl IAnswerRewriter for DroppingRewriter {
    fn rewrite(&self, _question: &str, sentences: &[String]) -> CiteResult<Vec<String>> {
        Ok(vec![sentences.join(" ")])
    }
}

struct InventingRewriter;

impl IAnswerRewriter for InventingRewriter {
    fn rewrite(&self, _question: &str, sentences: &[String]) -> CiteResult<Vec<String>> {
        Ok(sentences
            .iter()
            .map(|_| "Volcanic eruptions reshape football championships.".to_string())
            .collect())
    }
}

struct FailingRewriter;

impl IAnswerRewriter for FailingRewriter {
    fn rewrite(&self, _question: &str, _sentences: &[String]) -> CiteResult<Vec<String>> {
        Err(CiteError::ConfigError("rewriter offline".into()))
    }
}

#[test]
fn supported_rewrite_is_accepted() {
    let chunks = corpus_chunks();
    let candidates = candidates_for(&chunks);
    let q = "How is the lease liability measured?";
    let plain = composer().compose(q, &candidates, &chunks);
    let rewritten = composer()
        .with_rewriter(Arc::new(PrefixRewriter))
        .compose(q, &candidates, &chunks);
    assert!(rewritten.rewritten);
    assert_eq!(rewritten.claims.len(), plain.claims.len());
    assert_eq!(rewritten.cited_chunk_ids(), plain.cited_chunk_ids());
    assert!(rewritten.claims.iter().all(|c| c.text.starts_with("Notably, ")));
}

#[test]
fn unsafe_rewrites_fall_back_to_extractive_text() {
    let chunks = corpus_chunks();
    let candidates = candidates_for(&chunks);
    let q = "How is the lease liability measured?";
    let plain = composer().compose(q, &candidates, &chunks);
    assert!(plain.claims.len() > 1);

    let rewriters: [Arc<dyn IAnswerRewriter>; 3] =
        [Arc::new(DroppingRewriter), Arc::new(InventingRewriter), Arc::new(FailingRewriter)];
    for rewriter in rewriters {
        let answer = composer().with_rewriter(rewriter).compose(q, &candidates, &chunks);
        assert!(!answer.rewritten);
        assert_eq!(answer, plain);
    }
}

const WORDS: &[&str] = &[
    "lease", "liability", "lessee", "recognise", "payments", "discount", "rate", "revenue",
    "control", "internal", "reporting", "going", "concern", "auditor", "volcano", "football",
    "format", "disclosure", "judgements", "capital",
];

proptest! {
    #[test]
    fn prop_citations_stay_within_candidates(
        words in proptest::collection::vec(proptest::sample::select(WORDS), 1..5),
        picks in proptest::collection::vec(any::<bool>(), 12),
    ) {
        let chunks = corpus_chunks();
        let chosen: Vec<_> = chunks
            .iter()
            .zip(picks.iter().cycle())
            .filter(|(_, keep)| **keep)
            .map(|(c, _)| c.clone())
            .collect();
        let candidates = candidates_for(&chosen);
        let allowed: HashSet<String> = candidates.iter().map(|c| c.chunk_id.clone()).collect();
        let answer = composer().compose(&words.join(" "), &candidates, &chunks);
        match answer.outcome {
            AnswerOutcome::Grounded => {
                prop_assert!(!answer.claims.is_empty());
                for id in answer.cited_chunk_ids() {
                    prop_assert!(allowed.contains(&id));
                }
                assert_well_cited(&answer, &allowed);
            }
            AnswerOutcome::NoEvidence => prop_assert!(answer.citations.is_empty()),
        }
    }
}
