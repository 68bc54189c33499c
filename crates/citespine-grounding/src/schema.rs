//! Artifact schemas: the built-in `memo` plus any configured ones.

use std::collections::BTreeMap;

use citespine_core::config::GroundingConfig;
use citespine_core::constants::MEMO_SCHEMA;
use citespine_core::errors::{CiteError, CiteResult};
use citespine_core::models::{ArtifactSchema, SchemaField};

const MEMO_FIELDS: &[(&str, &str)] = &[
    ("title", "{question}"),
    ("issue", "{question}"),
    ("analysis", "{question}"),
    ("conclusion", "{question} therefore accordingly conclude"),
    ("references", "{question} see paragraph section reference"),
];

pub fn memo_schema() -> ArtifactSchema {
    ArtifactSchema {
        name: MEMO_SCHEMA.to_string(),
        fields: MEMO_FIELDS
            .iter()
            .map(|(name, cue)| SchemaField {
                name: (*name).to_string(),
                cue: (*cue).to_string(),
            })
            .collect(),
    }
}

#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, ArtifactSchema>,
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        let memo = memo_schema();
        Self {
            schemas: BTreeMap::from([(memo.name.clone(), memo)]),
        }
    }
}

impl SchemaRegistry {
    /// Built-ins plus configured schemas. A configured schema may replace a
    /// built-in of the same name; empty schemas and duplicate field names
    /// are rejected.
    pub fn from_config(config: &GroundingConfig) -> CiteResult<Self> {
        let mut registry = Self::default();
        for schema in &config.schemas {
            registry.register(ArtifactSchema {
                name: schema.name.clone(),
                fields: schema
                    .fields
                    .iter()
                    .map(|f| SchemaField {
                        name: f.name.clone(),
                        cue: f.cue.clone(),
                    })
                    .collect(),
            })?;
        }
        Ok(registry)
    }

    pub fn register(&mut self, schema: ArtifactSchema) -> CiteResult<()> {
        if schema.name.trim().is_empty() || schema.fields.is_empty() {
            return Err(CiteError::ConfigError(format!(
                "schema '{}' must have a name and at least one field",
                schema.name
            )));
        }
        let mut names: Vec<&str> = schema.fields.iter().map(|f| f.name.as_str()).collect();
        names.sort_unstable();
        if names.windows(2).any(|w| w[0] == w[1]) {
            return Err(CiteError::ConfigError(format!(
                "schema '{}' has duplicate field names",
                schema.name
            )));
        }
        self.schemas.insert(schema.name.clone(), schema);
        Ok(())
    }

    pub fn get(&self, name: &str) -> CiteResult<&ArtifactSchema> {
        self.schemas
            .get(name)
            .ok_or_else(|| CiteError::UnknownSchema {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.schemas.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use citespine_core::config::{SchemaConfig, SchemaFieldConfig};

    use super::*;

    #[test]
    fn memo_is_builtin() {
        let r = SchemaRegistry::default();
        let memo = r.get("memo").unwrap();
        let names: Vec<_> = memo.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["title", "issue", "analysis", "conclusion", "references"]);
        assert!(matches!(r.get("brief"), Err(CiteError::UnknownSchema { .. })));
    }

    #[test]
    fn configured_schemas_are_added() {
        let config = GroundingConfig {
            schemas: vec![SchemaConfig {
                name: "brief".into(),
                fields: vec![SchemaFieldConfig {
                    name: "summary".into(),
                    cue: "{question}".into(),
                }],
            }],
            ..GroundingConfig::default()
        };
        let r = SchemaRegistry::from_config(&config).unwrap();
        assert_eq!(r.names().collect::<Vec<_>>(), ["brief", "memo"]);
    }

    #[test]
    fn duplicate_fields_are_rejected() {
        let mut r = SchemaRegistry::default();
        let field = SchemaField {
            name: "x".into(),
            cue: "{question}".into(),
        };
        let err = r.register(ArtifactSchema {
            name: "dup".into(),
            fields: vec![field.clone(), field],
        });
        assert!(err.is_err());
    }
}
