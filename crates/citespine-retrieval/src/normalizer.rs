//! Raw caller filters → canonical `FilterPredicate`.

use std::sync::Arc;

use chrono::NaiveDate;

use citespine_core::config::CiteConfig;
use citespine_core::constants::AS_OF_KEY;
use citespine_core::errors::{CiteError, CiteResult};
use citespine_core::models::{FilterDimension, FilterPredicate, RawFilters};

use crate::vocabulary::Vocabulary;

#[derive(Debug, Clone)]
pub struct FilterNormalizer {
    vocabulary: Arc<Vocabulary>,
    default_as_of: NaiveDate,
}

impl FilterNormalizer {
    pub fn new(vocabulary: Arc<Vocabulary>, default_as_of: NaiveDate) -> Self {
        Self {
            vocabulary,
            default_as_of,
        }
    }

    pub fn from_config(config: &CiteConfig) -> CiteResult<Self> {
        let vocabulary = Vocabulary::from_config(&config.vocabulary)?;
        let default_as_of = parse_as_of(&config.retrieval.default_as_of)?;
        Ok(Self::new(Arc::new(vocabulary), default_as_of))
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn default_as_of(&self) -> NaiveDate {
        self.default_as_of
    }

    /// Canonicalize every filter. Blank values count as absent; unknown keys
    /// and values outside the vocabulary are rejected with the offending key.
    pub fn normalize(&self, raw: &RawFilters) -> CiteResult<FilterPredicate> {
        let mut predicate = FilterPredicate::at(self.default_as_of);
        for (key, value) in raw {
            let key = key.trim();
            let value = value.trim();
            if key == AS_OF_KEY {
                if !value.is_empty() {
                    predicate.as_of = parse_as_of(value)?;
                }
                continue;
            }
            let dimension = FilterDimension::from_key(key).ok_or_else(|| invalid(key, value))?;
            if value.is_empty() {
                continue;
            }
            let canonical = self
                .vocabulary
                .canonicalize(dimension, value)
                .ok_or_else(|| invalid(key, value))?;
            predicate.set(dimension, Some(canonical.to_string()));
        }
        Ok(predicate)
    }
}

fn invalid(key: &str, value: &str) -> CiteError {
    CiteError::InvalidFilterValue {
        key: key.to_string(),
        value: value.to_string(),
    }
}

fn parse_as_of(value: &str) -> CiteResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| invalid(AS_OF_KEY, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalizer() -> FilterNormalizer {
        FilterNormalizer::from_config(&CiteConfig::default()).unwrap()
    }

    fn raw(pairs: &[(&str, &str)]) -> RawFilters {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_as_of_when_missing() {
        let p = normalizer().normalize(&RawFilters::new()).unwrap();
        assert_eq!(p.as_of, NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert_eq!(p.constraints().count(), 0);
    }

    #[test]
    fn canonicalizes_synonyms_and_trims() {
        let p = normalizer()
            .normalize(&raw(&[
                ("jurisdiction", " U.S. "),
                ("framework", "us gaap"),
                ("as_of", "2024-12-31"),
            ]))
            .unwrap();
        assert_eq!(p.jurisdiction.as_deref(), Some("US"));
        assert_eq!(p.framework.as_deref(), Some("US_GAAP"));
        assert_eq!(p.as_of, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn blank_values_are_absent() {
        let p = normalizer()
            .normalize(&raw(&[("doc_type", "   "), ("as_of", "")]))
            .unwrap();
        assert_eq!(p.doc_type, None);
        assert_eq!(p.as_of, normalizer().default_as_of());
    }

    #[test]
    fn rejects_unknown_value_naming_the_key() {
        let err = normalizer()
            .normalize(&raw(&[("jurisdiction", "Atlantis")]))
            .unwrap_err();
        match err {
            CiteError::InvalidFilterValue { key, value } => {
                assert_eq!(key, "jurisdiction");
                assert_eq!(value, "Atlantis");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn rejects_unknown_key_and_bad_date() {
        let err = normalizer().normalize(&raw(&[("sector", "banking")])).unwrap_err();
        assert!(matches!(err, CiteError::InvalidFilterValue { ref key, .. } if key == "sector"));
        let err = normalizer().normalize(&raw(&[("as_of", "31/12/2024")])).unwrap_err();
        assert!(matches!(err, CiteError::InvalidFilterValue { ref key, .. } if key == "as_of"));
    }

    #[test]
    fn normalization_is_idempotent() {
        let n = normalizer();
        let once = n
            .normalize(&raw(&[("jurisdiction", "eu"), ("doc_type", "guidance")]))
            .unwrap();
        let twice = n.normalize(&once.to_raw()).unwrap();
        assert_eq!(once, twice);
    }
}
