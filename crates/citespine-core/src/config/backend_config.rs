use serde::{Deserialize, Serialize};

use super::defaults;

/// Which vector-store implementation a router talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    Local,
    Remote,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Local => crate::constants::BACKEND_LOCAL,
            BackendKind::Remote => crate::constants::BACKEND_REMOTE,
        }
    }
}

/// Vector backend selection plus per-backend settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Backend used by `query` and `generate`.
    pub active: BackendKind,
    pub local: LocalBackendConfig,
    pub remote: RemoteBackendConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            active: BackendKind::Local,
            local: LocalBackendConfig::default(),
            remote: RemoteBackendConfig::default(),
        }
    }
}

/// In-process partitioned index stored in the corpus database.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalBackendConfig {
    /// Number of random hyperplanes; the index has 2^bits partitions.
    pub partition_bits: u32,
    /// Seed for hyperplane generation. Changing it requires a rebuild.
    pub seed: u64,
}

impl Default for LocalBackendConfig {
    fn default() -> Self {
        Self {
            partition_bits: defaults::DEFAULT_PARTITION_BITS,
            seed: defaults::DEFAULT_PARTITION_SEED,
        }
    }
}

/// Hosted vector index reached over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteBackendConfig {
    /// Base URL of the index service. `None` uses the in-process loopback service.
    pub endpoint: Option<String>,
    pub index_name: String,
    pub namespace: String,
    /// Environment variable holding the API key.
    pub api_key_env: String,
    pub timeout_ms: u64,
}

impl Default for RemoteBackendConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            index_name: defaults::DEFAULT_REMOTE_INDEX.to_string(),
            namespace: defaults::DEFAULT_REMOTE_NAMESPACE.to_string(),
            api_key_env: defaults::DEFAULT_REMOTE_API_KEY_ENV.to_string(),
            timeout_ms: defaults::DEFAULT_REMOTE_TIMEOUT_MS,
        }
    }
}
