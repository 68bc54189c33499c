use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDate;

use citespine_core::errors::VersionError;
use citespine_core::models::{DocumentVersion, FilterPredicate, ResolvedPredicate};

#[derive(Debug, Clone)]
struct Interval {
    effective_date: NaiveDate,
    version_id: String,
}

/// Immutable per-family interval table. Safe to share across threads.
#[derive(Debug, Clone, Default)]
pub struct VersionResolver {
    families: HashMap<String, Vec<Interval>>,
    version_count: usize,
}

impl VersionResolver {
    /// Build the table, rejecting duplicate version ids and families with two
    /// versions effective on the same date.
    pub fn new<I>(versions: I) -> Result<Self, VersionError>
    where
        I: IntoIterator<Item = DocumentVersion>,
    {
        let mut families: HashMap<String, Vec<Interval>> = HashMap::new();
        let mut seen: HashSet<String> = HashSet::new();

        for v in versions {
            if v.superseded_by.as_deref() == Some(v.version_id.as_str()) {
                return Err(VersionError::SelfSupersession {
                    version_id: v.version_id,
                });
            }
            if !seen.insert(v.version_id.clone()) {
                return Err(VersionError::DuplicateVersionId {
                    version_id: v.version_id,
                });
            }
            families.entry(v.family_id).or_default().push(Interval {
                effective_date: v.effective_date,
                version_id: v.version_id,
            });
        }

        for (family_id, intervals) in families.iter_mut() {
            intervals.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));
            if let Some(pair) = intervals
                .windows(2)
                .find(|w| w[0].effective_date == w[1].effective_date)
            {
                return Err(VersionError::DuplicateEffectiveDate {
                    family_id: family_id.clone(),
                    date: pair[0].effective_date.format("%Y-%m-%d").to_string(),
                });
            }
        }

        Ok(Self {
            families,
            version_count: seen.len(),
        })
    }

    /// The version with the greatest effective date not after `as_of`.
    /// `None` means the family had no version in force and is excluded.
    pub fn resolve(&self, family_id: &str, as_of: NaiveDate) -> Option<&str> {
        let intervals = self.families.get(family_id)?;
        let idx = intervals.partition_point(|i| i.effective_date <= as_of);
        idx.checked_sub(1)
            .map(|i| intervals[i].version_id.as_str())
    }

    /// One eligible version per family, across all families.
    pub fn resolve_all(&self, as_of: NaiveDate) -> BTreeSet<String> {
        self.families
            .keys()
            .filter_map(|family| self.resolve(family, as_of))
            .map(str::to_string)
            .collect()
    }

    /// Restrict a predicate to exactly the versions in force at its as-of date.
    pub fn restrict(&self, filters: FilterPredicate) -> ResolvedPredicate {
        let version_ids = self.resolve_all(filters.as_of);
        tracing::debug!(
            as_of = %filters.as_of,
            eligible_versions = version_ids.len(),
            families = self.families.len(),
            "versions resolved"
        );
        ResolvedPredicate {
            filters,
            version_ids,
        }
    }

    /// Half-open validity interval `[from, until)` of a version.
    pub fn validity(&self, version_id: &str) -> Option<(NaiveDate, Option<NaiveDate>)> {
        self.families.values().find_map(|intervals| {
            let idx = intervals.iter().position(|i| i.version_id == version_id)?;
            let until = intervals.get(idx + 1).map(|next| next.effective_date);
            Some((intervals[idx].effective_date, until))
        })
    }

    pub fn family_count(&self) -> usize {
        self.families.len()
    }

    pub fn version_count(&self) -> usize {
        self.version_count
    }
}
