//! Remote embedding API client.
//!
//! OpenAI-compatible `/embeddings` request shape. Retries with exponential
//! backoff. Exhausting the retries opens a circuit for `cooldown`; the first
//! request after the cooldown is a single half-open attempt that closes the
//! circuit on success and reopens it on failure.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use citespine_core::errors::{CiteError, CiteResult, EmbeddingError};
use citespine_core::traits::IQueryEmbedder;

pub struct ApiEmbedder {
    client: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
    model_id: String,
    dimensions: usize,
    max_retries: u32,
    cooldown: Duration,
    /// Set while the circuit is open.
    open_until: Mutex<Option<Instant>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Circuit {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

impl ApiEmbedder {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        model_id: String,
        dimensions: usize,
        timeout: Duration,
        max_retries: u32,
        cooldown: Duration,
    ) -> CiteResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EmbeddingError::ProviderUnavailable {
                provider: format!("{model_id}: {e}"),
            })?;
        Ok(Self {
            client,
            endpoint,
            api_key,
            model_id,
            dimensions,
            max_retries,
            cooldown,
            open_until: Mutex::new(None),
        })
    }

    /// False while the circuit is open and the cooldown has not elapsed.
    pub fn is_available(&self) -> bool {
        self.circuit() != Circuit::Open
    }

    /// Close the circuit (e.g., after a health check).
    pub fn reset_availability(&self) {
        *self.open_until.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn circuit(&self) -> Circuit {
        match *self.open_until.lock().unwrap_or_else(PoisonError::into_inner) {
            None => Circuit::Closed,
            Some(until) if Instant::now() < until => Circuit::Open,
            Some(_) => Circuit::HalfOpen,
        }
    }

    fn trip(&self) {
        let until = Instant::now() + self.cooldown;
        *self.open_until.lock().unwrap_or_else(PoisonError::into_inner) = Some(until);
        warn!(
            model = %self.model_id,
            cooldown_ms = self.cooldown.as_millis() as u64,
            "embedding provider circuit opened"
        );
    }

    async fn request(&self, text: &str) -> CiteResult<Vec<f32>> {
        let circuit = self.circuit();
        if circuit == Circuit::Open {
            return Err(EmbeddingError::ProviderUnavailable {
                provider: self.model_id.clone(),
            }
            .into());
        }
        let max_retries = match circuit {
            Circuit::HalfOpen => 0,
            _ => self.max_retries,
        };

        let mut last_err: Option<CiteError> = None;
        for attempt in 0..=max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                tokio::time::sleep(delay).await;
                debug!(attempt, model = %self.model_id, "retrying embedding request");
            }
            match self.send(text).await {
                Ok(embedding) => {
                    if circuit == Circuit::HalfOpen {
                        debug!(model = %self.model_id, "embedding provider circuit closed");
                        self.reset_availability();
                    }
                    return Ok(embedding);
                }
                Err(e @ CiteError::EmbeddingError(EmbeddingError::DimensionMismatch { .. })) => {
                    return Err(e);
                }
                Err(e) => {
                    warn!(attempt, error = %e, "embedding request failed");
                    last_err = Some(e);
                }
            }
        }

        self.trip();
        Err(last_err.unwrap_or_else(|| {
            EmbeddingError::InferenceFailed {
                reason: "all retries exhausted".to_string(),
            }
            .into()
        }))
    }

    async fn send(&self, text: &str) -> CiteResult<Vec<f32>> {
        let mut request = self.client.post(&self.endpoint).json(&EmbedRequest {
            model: &self.model_id,
            input: vec![text],
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("HTTP error: {e}"),
            })?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::InferenceFailed {
                reason: format!("API returned {status}: {body}"),
            }
            .into());
        }

        let parsed: EmbedResponse =
            response
                .json()
                .await
                .map_err(|e| EmbeddingError::InferenceFailed {
                    reason: format!("JSON parse error: {e}"),
                })?;
        let embedding = parsed
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| EmbeddingError::InferenceFailed {
                reason: "empty response".to_string(),
            })?;
        if embedding.len() != self.dimensions {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.dimensions,
                actual: embedding.len(),
            }
            .into());
        }
        Ok(embedding)
    }
}

impl IQueryEmbedder for ApiEmbedder {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed(&self, text: &str) -> CiteResult<Vec<f32>> {
        self.request(text).await
    }
}
