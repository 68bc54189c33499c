//! Remote backend: hosted vector index behind a request/response transport.

mod filter;
mod http;
mod loopback;
pub mod protocol;
mod transport;

pub use filter::{compile as compile_filter, evaluate as evaluate_filter};
pub use http::HttpTransport;
pub use loopback::LoopbackTransport;
pub use transport::{IRemoteTransport, RemoteTransport};

use citespine_core::constants::BACKEND_REMOTE;
use citespine_core::errors::BackendError;
use citespine_core::models::{BackendIdentity, ChunkMetadata, ResolvedPredicate, ScoredChunk};
use citespine_core::traits::IVectorStore;

use crate::check_dimensions;
use protocol::{metadata_from_remote, metadata_to_remote, QueryRequest, RemoteRecord, StatsRequest, UpsertRequest};

pub struct RemoteVectorStore<T: IRemoteTransport> {
    transport: T,
    index_name: String,
    namespace: String,
    dimensions: usize,
}

impl<T: IRemoteTransport> RemoteVectorStore<T> {
    pub fn new(transport: T, index_name: &str, namespace: &str, dimensions: usize) -> Self {
        Self {
            transport,
            index_name: index_name.to_string(),
            namespace: namespace.to_string(),
            dimensions,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }
}

impl<T: IRemoteTransport> IVectorStore for RemoteVectorStore<T> {
    fn identity(&self) -> BackendIdentity {
        BackendIdentity {
            kind: BACKEND_REMOTE.to_string(),
            instance: format!("{}/{}", self.index_name, self.namespace),
        }
    }

    async fn upsert(
        &self,
        chunk_id: &str,
        embedding: &[f32],
        metadata: &ChunkMetadata,
    ) -> Result<(), BackendError> {
        check_dimensions(self.dimensions, embedding.len())?;
        let request = UpsertRequest {
            namespace: self.namespace.clone(),
            vectors: vec![RemoteRecord {
                id: chunk_id.to_string(),
                values: embedding.to_vec(),
                metadata: metadata_to_remote(metadata),
            }],
        };
        self.transport.upsert(&request).await.map(|_| ())
    }

    /// The hosted index searches exhaustively, so `probes` is ignored.
    async fn query(
        &self,
        embedding: &[f32],
        predicate: &ResolvedPredicate,
        top_k: usize,
        _probes: usize,
    ) -> Result<Vec<ScoredChunk>, BackendError> {
        check_dimensions(self.dimensions, embedding.len())?;
        if top_k == 0 || predicate.is_empty() {
            return Ok(Vec::new());
        }
        let request = QueryRequest {
            namespace: self.namespace.clone(),
            vector: embedding.to_vec(),
            top_k,
            filter: filter::compile(predicate),
            include_metadata: true,
        };
        let response = self.transport.query(&request).await?;

        response
            .matches
            .into_iter()
            .map(|m| {
                let metadata = m
                    .metadata
                    .as_ref()
                    .and_then(metadata_from_remote)
                    .ok_or_else(|| BackendError::InvalidResponse {
                        backend: BACKEND_REMOTE.to_string(),
                        reason: format!("match {} is missing metadata", m.id),
                    })?;
                Ok(ScoredChunk {
                    chunk_id: m.id,
                    score: m.score,
                    metadata,
                })
            })
            .collect()
    }

    async fn len(&self) -> Result<usize, BackendError> {
        let stats = self
            .transport
            .stats(&StatsRequest {
                namespace: self.namespace.clone(),
            })
            .await?;
        Ok(stats.vector_count)
    }
}
