use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::ChunkMetadata;

/// Caller-supplied filters, keyed by dimension name plus `as_of`.
pub type RawFilters = BTreeMap<String, String>;

/// The four metadata dimensions a request can constrain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterDimension {
    Framework,
    Jurisdiction,
    DocType,
    AuthorityLevel,
}

impl FilterDimension {
    pub const ALL: [FilterDimension; 4] = [
        FilterDimension::Framework,
        FilterDimension::Jurisdiction,
        FilterDimension::DocType,
        FilterDimension::AuthorityLevel,
    ];

    /// Filter key as it appears in requests and backend metadata.
    pub fn key(&self) -> &'static str {
        match self {
            FilterDimension::Framework => "framework",
            FilterDimension::Jurisdiction => "jurisdiction",
            FilterDimension::DocType => "doc_type",
            FilterDimension::AuthorityLevel => "authority_level",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.key() == key)
    }

    /// The value of this dimension in a chunk's metadata.
    pub fn value_of<'a>(&self, metadata: &'a ChunkMetadata) -> &'a str {
        match self {
            FilterDimension::Framework => &metadata.framework,
            FilterDimension::Jurisdiction => &metadata.jurisdiction,
            FilterDimension::DocType => &metadata.doc_type,
            FilterDimension::AuthorityLevel => &metadata.authority_level,
        }
    }
}

/// Canonicalized filters. Every present value is a vocabulary canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPredicate {
    pub framework: Option<String>,
    pub jurisdiction: Option<String>,
    pub doc_type: Option<String>,
    pub authority_level: Option<String>,
    pub as_of: NaiveDate,
}

impl FilterPredicate {
    /// An unconstrained predicate at the given date.
    pub fn at(as_of: NaiveDate) -> Self {
        Self {
            framework: None,
            jurisdiction: None,
            doc_type: None,
            authority_level: None,
            as_of,
        }
    }

    pub fn value(&self, dimension: FilterDimension) -> Option<&str> {
        match dimension {
            FilterDimension::Framework => self.framework.as_deref(),
            FilterDimension::Jurisdiction => self.jurisdiction.as_deref(),
            FilterDimension::DocType => self.doc_type.as_deref(),
            FilterDimension::AuthorityLevel => self.authority_level.as_deref(),
        }
    }

    pub fn set(&mut self, dimension: FilterDimension, value: Option<String>) {
        let slot = match dimension {
            FilterDimension::Framework => &mut self.framework,
            FilterDimension::Jurisdiction => &mut self.jurisdiction,
            FilterDimension::DocType => &mut self.doc_type,
            FilterDimension::AuthorityLevel => &mut self.authority_level,
        };
        *slot = value;
    }

    /// Constrained dimensions and their canonical values.
    pub fn constraints(&self) -> impl Iterator<Item = (FilterDimension, &str)> + '_ {
        FilterDimension::ALL
            .into_iter()
            .filter_map(|d| self.value(d).map(|v| (d, v)))
    }

    /// Back to the raw key/value form, e.g. for reports.
    pub fn to_raw(&self) -> RawFilters {
        let mut raw: RawFilters = self
            .constraints()
            .map(|(d, v)| (d.key().to_string(), v.to_string()))
            .collect();
        raw.insert(
            crate::constants::AS_OF_KEY.to_string(),
            self.as_of.format("%Y-%m-%d").to_string(),
        );
        raw
    }
}

/// A predicate restricted to the exact set of version ids eligible at `as_of`.
/// This is what backends receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedPredicate {
    pub filters: FilterPredicate,
    pub version_ids: BTreeSet<String>,
}

impl ResolvedPredicate {
    /// The first constraint `metadata` fails, or `None` if it satisfies all of them.
    pub fn violation(&self, metadata: &ChunkMetadata) -> Option<&'static str> {
        for (dimension, value) in self.filters.constraints() {
            if dimension.value_of(metadata) != value {
                return Some(dimension.key());
            }
        }
        if metadata.effective_date > self.filters.as_of {
            return Some(crate::constants::AS_OF_KEY);
        }
        if !self.version_ids.contains(&metadata.version_id) {
            return Some("version_id");
        }
        None
    }

    pub fn admits(&self, metadata: &ChunkMetadata) -> bool {
        self.violation(metadata).is_none()
    }

    /// No version is eligible, so no chunk can match.
    pub fn is_empty(&self) -> bool {
        self.version_ids.is_empty()
    }
}
