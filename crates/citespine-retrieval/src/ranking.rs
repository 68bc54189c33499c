//! Deterministic ordering and predicate verification of backend hits.

use std::cmp::Ordering;
use std::collections::HashSet;

use citespine_core::errors::BackendError;
use citespine_core::models::{ResolvedPredicate, RetrievalCandidate, ScoredChunk};

/// Descending score, then ascending chunk id.
pub fn compare_hits(a: &ScoredChunk, b: &ScoredChunk) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.chunk_id.cmp(&b.chunk_id))
}

/// Check each hit against `predicate` using the metadata the backend
/// echoed, then order and keep the first `top_k`. A failing hit is a backend
/// contract violation and fails the whole call.
pub fn rank_candidates(
    mut hits: Vec<ScoredChunk>,
    predicate: &ResolvedPredicate,
    top_k: usize,
    backend: &str,
) -> Result<Vec<RetrievalCandidate>, BackendError> {
    if let Some((hit, dimension)) = hits
        .iter()
        .find_map(|h| predicate.violation(&h.metadata).map(|d| (h, d)))
    {
        return Err(BackendError::PredicateViolation {
            backend: backend.to_string(),
            chunk_id: hit.chunk_id.clone(),
            dimension: dimension.to_string(),
        });
    }

    hits.sort_by(compare_hits);
    let mut seen = HashSet::new();
    hits.retain(|h| seen.insert(h.chunk_id.clone()));
    hits.truncate(top_k);

    Ok(hits
        .into_iter()
        .enumerate()
        .map(|(i, hit)| RetrievalCandidate {
            chunk_id: hit.chunk_id,
            score: hit.score,
            rank: i + 1,
            predicate_pass: true,
            metadata: hit.metadata,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use chrono::NaiveDate;
    use citespine_core::models::{ChunkMetadata, FilterPredicate};

    use super::*;

    fn meta(jurisdiction: &str) -> ChunkMetadata {
        ChunkMetadata {
            framework: "IFRS".into(),
            jurisdiction: jurisdiction.into(),
            doc_type: "standard".into(),
            authority_level: "authoritative".into(),
            family_id: "f".into(),
            version_id: "v1".into(),
            effective_date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        }
    }

    fn hit(id: &str, score: f64, jurisdiction: &str) -> ScoredChunk {
        ScoredChunk {
            chunk_id: id.into(),
            score,
            metadata: meta(jurisdiction),
        }
    }

    fn predicate(jurisdiction: Option<&str>) -> ResolvedPredicate {
        let mut filters = FilterPredicate::at(NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        filters.jurisdiction = jurisdiction.map(String::from);
        ResolvedPredicate {
            filters,
            version_ids: BTreeSet::from(["v1".to_string()]),
        }
    }

    #[test]
    fn ties_break_on_chunk_id() {
        let hits = vec![hit("c", 0.5, "EU"), hit("a", 0.5, "EU"), hit("b", 0.9, "EU")];
        let ranked = rank_candidates(hits, &predicate(None), 10, "local").unwrap();
        let ids: Vec<_> = ranked.iter().map(|c| c.chunk_id.as_str()).collect();
        assert_eq!(ids, ["b", "a", "c"]);
        assert_eq!(ranked.iter().map(|c| c.rank).collect::<Vec<_>>(), [1, 2, 3]);
        assert!(ranked.iter().all(|c| c.predicate_pass));
    }

    #[test]
    fn leaked_hit_is_a_violation() {
        let hits = vec![hit("a", 0.9, "US"), hit("b", 0.8, "EU")];
        let err = rank_candidates(hits, &predicate(Some("US")), 10, "remote").unwrap_err();
        assert_eq!(
            err,
            BackendError::PredicateViolation {
                backend: "remote".into(),
                chunk_id: "b".into(),
                dimension: "jurisdiction".into(),
            }
        );
    }

    #[test]
    fn truncates_to_top_k() {
        let hits = (0..8).map(|i| hit(&format!("c{i}"), i as f64 / 10.0, "EU")).collect();
        let ranked = rank_candidates(hits, &predicate(None), 3, "local").unwrap();
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].chunk_id, "c7");
    }
}
