use serde::{Deserialize, Serialize};

use super::defaults;

/// Evidence composition and artifact filling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundingConfig {
    /// Minimum entailment score for a span to support a claim or field.
    pub entailment_threshold: f64,
    /// Maximum claims in a composed answer.
    pub max_claims: usize,
    /// Additional artifact schemas beyond the built-in memo.
    pub schemas: Vec<SchemaConfig>,
}

impl Default for GroundingConfig {
    fn default() -> Self {
        Self {
            entailment_threshold: defaults::DEFAULT_ENTAILMENT_THRESHOLD,
            max_claims: defaults::DEFAULT_MAX_CLAIMS,
            schemas: Vec::new(),
        }
    }
}

/// A user-defined artifact schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaConfig {
    pub name: String,
    pub fields: Vec<SchemaFieldConfig>,
}

/// One schema field and the cue text used to ground it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaFieldConfig {
    pub name: String,
    pub cue: String,
}
