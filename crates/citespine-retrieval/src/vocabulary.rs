//! Controlled vocabulary with synonym resolution.

use std::collections::HashMap;

use citespine_core::config::{VocabularyConfig, VocabularyTerm};
use citespine_core::errors::{CiteError, CiteResult};
use citespine_core::models::FilterDimension;

/// Per-dimension lookup from normalized spelling to canonical value.
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    tables: HashMap<FilterDimension, HashMap<String, String>>,
}

/// Lowercase and fold punctuation. Underscores, hyphens and slashes act as
/// spaces; other punctuation is dropped; runs of spaces collapse to one.
pub fn normalize_term(raw: &str) -> String {
    let folded: String = raw
        .chars()
        .filter_map(|c| match c {
            c if c.is_alphanumeric() => Some(c),
            c if c.is_whitespace() => Some(' '),
            '_' | '-' | '/' => Some(' '),
            _ => None,
        })
        .collect();
    folded.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

impl Vocabulary {
    pub fn from_config(config: &VocabularyConfig) -> CiteResult<Self> {
        let mut vocabulary = Self::default();
        for (dimension, terms) in [
            (FilterDimension::Framework, &config.framework),
            (FilterDimension::Jurisdiction, &config.jurisdiction),
            (FilterDimension::DocType, &config.doc_type),
            (FilterDimension::AuthorityLevel, &config.authority_level),
        ] {
            vocabulary.add_terms(dimension, terms)?;
        }
        Ok(vocabulary)
    }

    fn add_terms(&mut self, dimension: FilterDimension, terms: &[VocabularyTerm]) -> CiteResult<()> {
        let table = self.tables.entry(dimension).or_default();
        for term in terms {
            let spellings = std::iter::once(&term.canonical).chain(&term.synonyms);
            for spelling in spellings {
                let key = normalize_term(spelling);
                if key.is_empty() {
                    continue;
                }
                if let Some(previous) = table.insert(key.clone(), term.canonical.clone()) {
                    if previous != term.canonical {
                        return Err(CiteError::ConfigError(format!(
                            "vocabulary {}: '{key}' maps to both '{previous}' and '{}'",
                            dimension.key(),
                            term.canonical
                        )));
                    }
                }
            }
        }
        Ok(())
    }

    /// Canonical value for `raw` in `dimension`, matched case-insensitively.
    pub fn canonicalize(&self, dimension: FilterDimension, raw: &str) -> Option<&str> {
        self.tables
            .get(&dimension)?
            .get(&normalize_term(raw))
            .map(String::as_str)
    }

    /// Distinct canonical values of a dimension, sorted.
    pub fn canonical_values(&self, dimension: FilterDimension) -> Vec<&str> {
        let mut values: Vec<&str> = self
            .tables
            .get(&dimension)
            .map(|t| t.values().map(String::as_str).collect())
            .unwrap_or_default();
        values.sort_unstable();
        values.dedup();
        values
    }
}
