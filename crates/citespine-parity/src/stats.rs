//! Coverage arithmetic and nearest-rank percentiles.

use std::collections::BTreeSet;

use citespine_core::models::{CoverageAggregate, QueryCoverage};

/// Overlap of two top-k lists.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlap {
    pub coverage: f64,
    pub jaccard: f64,
    pub only_in_a: Vec<String>,
    pub only_in_b: Vec<String>,
}

/// Compare two ranked id lists at depth `k`.
///
/// Coverage is `|A ∩ B| / k`: a slice with fewer than `k` eligible chunks
/// cannot reach full coverage even when both sides return the same ids.
/// Jaccard is over the two top-k sets; two empty sets are identical.
pub fn compare_top_k(a: &[String], b: &[String], k: usize) -> Overlap {
    let set_a: BTreeSet<&String> = a.iter().take(k).collect();
    let set_b: BTreeSet<&String> = b.iter().take(k).collect();

    let shared = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();

    let coverage = shared as f64 / k.max(1) as f64;
    let jaccard = if union == 0 {
        1.0
    } else {
        shared as f64 / union as f64
    };

    Overlap {
        coverage,
        jaccard,
        only_in_a: set_a.difference(&set_b).map(|s| s.to_string()).collect(),
        only_in_b: set_b.difference(&set_a).map(|s| s.to_string()).collect(),
    }
}

/// Nearest-rank percentile of an ascending slice, `pct` in (0, 100].
pub fn nearest_rank(sorted: &[f64], pct: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let rank = ((pct / 100.0) * sorted.len() as f64).ceil() as usize;
    sorted[rank.clamp(1, sorted.len()) - 1]
}

pub fn aggregate(per_query: &[QueryCoverage]) -> CoverageAggregate {
    let n = per_query.len();
    if n == 0 {
        return CoverageAggregate {
            query_count: 0,
            mean: 0.0,
            min: 0.0,
            p50: 0.0,
            p90: 0.0,
            mean_jaccard: 0.0,
        };
    }

    let mut coverages: Vec<f64> = per_query.iter().map(|q| q.coverage).collect();
    coverages.sort_by(f64::total_cmp);

    CoverageAggregate {
        query_count: n,
        mean: coverages.iter().sum::<f64>() / n as f64,
        min: coverages[0],
        p50: nearest_rank(&coverages, 50.0),
        p90: nearest_rank(&coverages, 90.0),
        mean_jaccard: per_query.iter().map(|q| q.jaccard).sum::<f64>() / n as f64,
    }
}
