use serde::{Deserialize, Serialize};

use super::{BackendIdentity, RawFilters};

/// One entry of a parity query set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParityQuery {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub filters: RawFilters,
}

/// Overlap between the two backends for one query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryCoverage {
    pub query_id: String,
    pub filters: RawFilters,
    /// |topK_a ∩ topK_b| / k
    pub coverage: f64,
    pub jaccard: f64,
    pub only_in_a: Vec<String>,
    pub only_in_b: Vec<String>,
}

impl QueryCoverage {
    /// Both backends returned the same top-k set, however short.
    pub fn agrees(&self) -> bool {
        self.only_in_a.is_empty() && self.only_in_b.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageAggregate {
    pub query_count: usize,
    pub mean: f64,
    pub min: f64,
    pub p50: f64,
    pub p90: f64,
    pub mean_jaccard: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParityReport {
    pub backend_a: BackendIdentity,
    pub backend_b: BackendIdentity,
    pub top_k: usize,
    pub per_query: Vec<QueryCoverage>,
    pub aggregate: CoverageAggregate,
    /// Queries whose top-k sets differ.
    pub disagreements: Vec<QueryCoverage>,
    /// Queries that could not be run (e.g. invalid filters), with the error.
    pub failures: Vec<(String, String)>,
}

impl ParityReport {
    pub fn meets_floor(&self, floor: f64) -> bool {
        self.aggregate.query_count > 0 && self.aggregate.mean >= floor
    }
}
