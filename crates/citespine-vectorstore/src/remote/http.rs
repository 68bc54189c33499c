//! reqwest transport for the hosted index.

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use citespine_core::constants::BACKEND_REMOTE;
use citespine_core::errors::{BackendError, CiteError, CiteResult};

use super::protocol::{QueryRequest, QueryResponse, StatsRequest, StatsResponse, UpsertRequest, UpsertResponse};
use super::transport::IRemoteTransport;

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(base_url: &str, api_key: Option<String>, timeout_ms: u64) -> CiteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .map_err(|e| CiteError::ConfigError(format!("remote HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout_ms,
        })
    }

    async fn post<B: Serialize, R: DeserializeOwned>(&self, path: &str, body: &B) -> Result<R, BackendError> {
        let mut request = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body);
        if let Some(key) = &self.api_key {
            request = request.header("Api-Key", key);
        }

        let response = request.send().await.map_err(|e| self.transport_error(e))?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, body));
        }
        response.json::<R>().await.map_err(|e| BackendError::InvalidResponse {
            backend: BACKEND_REMOTE.to_string(),
            reason: format!("{path}: {e}"),
        })
    }

    fn transport_error(&self, e: reqwest::Error) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout {
                backend: BACKEND_REMOTE.to_string(),
                timeout_ms: self.timeout_ms,
            }
        } else {
            BackendError::Unavailable {
                backend: BACKEND_REMOTE.to_string(),
                reason: e.to_string(),
            }
        }
    }
}

/// 429 and 5xx are worth retrying; other statuses are contract failures.
fn classify_status(status: StatusCode, body: String) -> BackendError {
    if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
        BackendError::Unavailable {
            backend: BACKEND_REMOTE.to_string(),
            reason: format!("HTTP {status}: {body}"),
        }
    } else {
        BackendError::InvalidResponse {
            backend: BACKEND_REMOTE.to_string(),
            reason: format!("HTTP {status}: {body}"),
        }
    }
}

impl IRemoteTransport for HttpTransport {
    async fn upsert(&self, request: &UpsertRequest) -> Result<UpsertResponse, BackendError> {
        self.post("/vectors/upsert", request).await
    }

    async fn query(&self, request: &QueryRequest) -> Result<QueryResponse, BackendError> {
        self.post("/query", request).await
    }

    async fn stats(&self, request: &StatsRequest) -> Result<StatsResponse, BackendError> {
        self.post("/describe_index_stats", request).await
    }
}
