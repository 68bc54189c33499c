//! Replay judgement: compare a reissued call against its manifest.

use citespine_core::models::{Manifest, ReplayReport};

use crate::hashing::output_hash;
use crate::similarity::normalized_similarity;

/// What the reissued call produced.
#[derive(Debug, Clone)]
pub struct ReplayObservation {
    pub chunk_ids: Vec<String>,
    pub answer_text: String,
    pub output: serde_json::Value,
    pub corpus_hash: String,
    pub embedding_model: String,
}

/// Judge a replay. Passing requires the identical chunk-id sequence and an
/// answer similarity at or above `threshold`. Corpus, model and output-hash
/// changes are reported but do not fail the replay on their own.
pub fn compare(original: &Manifest, observed: &ReplayObservation, threshold: f64) -> ReplayReport {
    let retrieval_identity = original.retrieved_chunk_ids == observed.chunk_ids;
    let answer_similarity = normalized_similarity(&original.answer_text, &observed.answer_text);
    let output_hash_match = output_hash(&observed.output) == original.output_hash;
    let corpus_changed = original.corpus_hash != observed.corpus_hash;
    let embedding_model_changed = original.embedding_model != observed.embedding_model;

    let mut mismatches = Vec::new();
    if !retrieval_identity {
        mismatches.push(describe_sequence_change(&original.retrieved_chunk_ids, &observed.chunk_ids));
    }
    if answer_similarity < threshold {
        mismatches.push(format!(
            "answer similarity {answer_similarity:.4} below threshold {threshold:.2}"
        ));
    }
    if !output_hash_match {
        mismatches.push("output hash differs".to_string());
    }
    if corpus_changed {
        mismatches.push(format!(
            "corpus hash changed from {} to {}",
            short(&original.corpus_hash),
            short(&observed.corpus_hash)
        ));
    }
    if embedding_model_changed {
        mismatches.push(format!(
            "embedding model changed from {} to {}",
            original.embedding_model, observed.embedding_model
        ));
    }

    ReplayReport {
        manifest_id: original.id.clone(),
        retrieval_identity,
        answer_similarity,
        similarity_threshold: threshold,
        output_hash_match,
        corpus_changed,
        embedding_model_changed,
        original_chunk_ids: original.retrieved_chunk_ids.clone(),
        replayed_chunk_ids: observed.chunk_ids.clone(),
        mismatches,
        pass: retrieval_identity && answer_similarity >= threshold,
    }
}

fn describe_sequence_change(original: &[String], replayed: &[String]) -> String {
    match original.iter().zip(replayed).position(|(a, b)| a != b) {
        Some(i) => format!(
            "retrieval diverges at rank {}: {} vs {}",
            i + 1,
            original[i],
            replayed[i]
        ),
        None => format!(
            "retrieval length changed from {} to {}",
            original.len(),
            replayed.len()
        ),
    }
}

fn short(hash: &str) -> &str {
    &hash[..hash.len().min(12)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use citespine_core::models::{BackendIdentity, FilterPredicate, NormalizedInputs, OperationKind};
    use serde_json::json;

    fn manifest(ids: &[&str], answer: &str) -> Manifest {
        let output = json!({ "answer": answer });
        Manifest {
            id: "m-1".into(),
            created_at: Utc::now(),
            operation: OperationKind::Query,
            inputs: NormalizedInputs {
                query_text: "lease liability".into(),
                predicate: FilterPredicate::at(chrono::NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()),
                version_ids: vec!["v1".into()],
                top_k: 5,
                probes: 8,
                schema: None,
            },
            backend: BackendIdentity {
                kind: "local".into(),
                instance: ":memory:".into(),
            },
            embedding_model: "hashed-384".into(),
            corpus_hash: "a".repeat(64),
            retrieved_chunk_ids: ids.iter().map(|s| s.to_string()).collect(),
            cited_chunk_ids: Vec::new(),
            answer_text: answer.into(),
            output_hash: output_hash(&output),
            output,
            latency_ms: 3,
        }
    }

    fn observed(ids: &[&str], answer: &str) -> ReplayObservation {
        ReplayObservation {
            chunk_ids: ids.iter().map(|s| s.to_string()).collect(),
            answer_text: answer.into(),
            output: json!({ "answer": answer }),
            corpus_hash: "a".repeat(64),
            embedding_model: "hashed-384".into(),
        }
    }

    #[test]
    fn identical_replay_passes_cleanly() {
        let m = manifest(&["c1", "c2"], "Lessees recognise a liability [1].");
        let report = compare(&m, &observed(&["c1", "c2"], "Lessees recognise a liability [1]."), 0.95);
        assert!(report.pass);
        assert!(report.output_hash_match);
        assert!(report.mismatches.is_empty());
        assert_eq!(report.answer_similarity, 1.0);
    }

    #[test]
    fn reordered_retrieval_fails() {
        let m = manifest(&["c1", "c2"], "x");
        let report = compare(&m, &observed(&["c2", "c1"], "x"), 0.95);
        assert!(!report.pass);
        assert!(!report.retrieval_identity);
        assert!(report.mismatches[0].contains("rank 1"));
    }

    #[test]
    fn truncated_retrieval_reports_length() {
        let m = manifest(&["c1", "c2"], "x");
        let report = compare(&m, &observed(&["c1"], "x"), 0.95);
        assert!(report.mismatches[0].contains("length changed from 2 to 1"));
    }

    #[test]
    fn small_wording_drift_within_threshold_passes() {
        let answer = "Lessees recognise a right-of-use asset and a lease liability for all leases [1].";
        let m = manifest(&["c1"], answer);
        let drifted = answer.replace("recognise", "recognize");
        let report = compare(&m, &observed(&["c1"], &drifted), 0.95);
        assert!(report.pass);
        assert!(!report.output_hash_match);
        assert!(report.mismatches.iter().any(|m| m.contains("output hash")));
    }

    #[test]
    fn corpus_change_is_reported_not_failed() {
        let m = manifest(&["c1"], "x");
        let mut obs = observed(&["c1"], "x");
        obs.corpus_hash = "b".repeat(64);
        obs.embedding_model = "api:text-embedding-3-small".into();
        let report = compare(&m, &obs, 0.95);
        assert!(report.pass);
        assert!(report.corpus_changed);
        assert!(report.embedding_model_changed);
        assert_eq!(report.mismatches.len(), 2);
    }
}
