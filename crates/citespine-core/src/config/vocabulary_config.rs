use serde::{Deserialize, Serialize};

use super::defaults;

/// Controlled vocabulary for the four filter dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabularyConfig {
    pub framework: Vec<VocabularyTerm>,
    pub jurisdiction: Vec<VocabularyTerm>,
    pub doc_type: Vec<VocabularyTerm>,
    pub authority_level: Vec<VocabularyTerm>,
}

/// A canonical value and the synonyms that map onto it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VocabularyTerm {
    pub canonical: String,
    #[serde(default)]
    pub synonyms: Vec<String>,
}

fn terms(table: &[(&str, &[&str])]) -> Vec<VocabularyTerm> {
    table
        .iter()
        .map(|(canonical, synonyms)| VocabularyTerm {
            canonical: (*canonical).to_string(),
            synonyms: synonyms.iter().map(|s| (*s).to_string()).collect(),
        })
        .collect()
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            framework: terms(defaults::DEFAULT_FRAMEWORKS),
            jurisdiction: terms(defaults::DEFAULT_JURISDICTIONS),
            doc_type: terms(defaults::DEFAULT_DOC_TYPES),
            authority_level: terms(defaults::DEFAULT_AUTHORITY_LEVELS),
        }
    }
}
