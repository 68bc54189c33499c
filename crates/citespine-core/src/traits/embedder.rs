use std::future::Future;

use crate::errors::CiteResult;

/// Turns query text into an embedding comparable with the stored corpus.
pub trait IQueryEmbedder: Send + Sync {
    /// Identifier recorded in manifests; replay compares it.
    fn model_id(&self) -> &str;

    fn dimensions(&self) -> usize;

    fn embed(&self, text: &str) -> impl Future<Output = CiteResult<Vec<f32>>> + Send;
}
