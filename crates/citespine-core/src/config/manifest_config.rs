use serde::{Deserialize, Serialize};

use super::defaults;

/// Where manifests are persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ManifestStoreKind {
    /// `manifests` table in the corpus database.
    Sqlite,
    /// One JSON file per manifest.
    Directory,
}

/// Manifest and replay configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManifestConfig {
    pub store: ManifestStoreKind,
    /// Directory for the directory store.
    pub directory: String,
    /// Minimum normalized edit similarity for a replay to pass.
    pub answer_similarity_threshold: f64,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            store: ManifestStoreKind::Sqlite,
            directory: defaults::DEFAULT_MANIFEST_DIR.to_string(),
            answer_similarity_threshold: defaults::DEFAULT_ANSWER_SIMILARITY_THRESHOLD,
        }
    }
}
