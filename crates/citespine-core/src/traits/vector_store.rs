use std::future::Future;

use crate::errors::BackendError;
use crate::models::{BackendIdentity, ChunkMetadata, ResolvedPredicate, ScoredChunk};

/// Predicate-constrained nearest-neighbor search over chunk embeddings.
///
/// Implementations apply the predicate while generating candidates, never as
/// a post-filter, and report failures without retrying.
pub trait IVectorStore: Send + Sync {
    /// Stable identity of this backend instance, recorded in manifests.
    fn identity(&self) -> BackendIdentity;

    /// Insert or replace one vector. Repeating an upsert is a no-op.
    fn upsert(
        &self,
        chunk_id: &str,
        embedding: &[f32],
        metadata: &ChunkMetadata,
    ) -> impl Future<Output = Result<(), BackendError>> + Send;

    /// Up to `top_k` chunks admitted by `predicate`, best-first by cosine
    /// similarity. `probes` widens the candidate pool; raising it never
    /// lowers recall.
    fn query(
        &self,
        embedding: &[f32],
        predicate: &ResolvedPredicate,
        top_k: usize,
        probes: usize,
    ) -> impl Future<Output = Result<Vec<ScoredChunk>, BackendError>> + Send;

    /// Number of stored vectors.
    fn len(&self) -> impl Future<Output = Result<usize, BackendError>> + Send;
}
