//! Runtime backend selection.

use std::sync::Arc;

use citespine_core::config::{BackendConfig, BackendKind};
use citespine_core::errors::{BackendError, CiteResult};
use citespine_core::models::{BackendIdentity, ChunkMetadata, ResolvedPredicate, ScoredChunk};
use citespine_core::traits::IVectorStore;
use citespine_storage::StorageEngine;

use crate::local::LocalVectorStore;
use crate::remote::{HttpTransport, LoopbackTransport, RemoteTransport, RemoteVectorStore};

/// Either backend behind one concrete type, so routers need no boxing.
pub enum VectorBackend {
    Local(LocalVectorStore),
    Remote(RemoteVectorStore<RemoteTransport>),
}

impl VectorBackend {
    /// Build the backend of `kind`. A remote backend without an endpoint
    /// talks to an in-process loopback index.
    pub fn from_config(
        kind: BackendKind,
        config: &BackendConfig,
        storage: Arc<StorageEngine>,
        dimensions: usize,
    ) -> CiteResult<Self> {
        match kind {
            BackendKind::Local => Ok(VectorBackend::Local(LocalVectorStore::open(
                storage,
                &config.local,
                dimensions,
            )?)),
            BackendKind::Remote => {
                let remote = &config.remote;
                let transport = match &remote.endpoint {
                    Some(endpoint) => RemoteTransport::Http(HttpTransport::new(
                        endpoint,
                        std::env::var(&remote.api_key_env).ok(),
                        remote.timeout_ms,
                    )?),
                    None => RemoteTransport::Loopback(Arc::new(LoopbackTransport::new())),
                };
                Ok(Self::remote(transport, config, dimensions))
            }
        }
    }

    pub fn remote(transport: RemoteTransport, config: &BackendConfig, dimensions: usize) -> Self {
        VectorBackend::Remote(RemoteVectorStore::new(
            transport,
            &config.remote.index_name,
            &config.remote.namespace,
            dimensions,
        ))
    }

    pub fn kind(&self) -> BackendKind {
        match self {
            VectorBackend::Local(_) => BackendKind::Local,
            VectorBackend::Remote(_) => BackendKind::Remote,
        }
    }
}

impl IVectorStore for VectorBackend {
    fn identity(&self) -> BackendIdentity {
        match self {
            VectorBackend::Local(s) => s.identity(),
            VectorBackend::Remote(s) => s.identity(),
        }
    }

    async fn upsert(
        &self,
        chunk_id: &str,
        embedding: &[f32],
        metadata: &ChunkMetadata,
    ) -> Result<(), BackendError> {
        match self {
            VectorBackend::Local(s) => s.upsert(chunk_id, embedding, metadata).await,
            VectorBackend::Remote(s) => s.upsert(chunk_id, embedding, metadata).await,
        }
    }

    async fn query(
        &self,
        embedding: &[f32],
        predicate: &ResolvedPredicate,
        top_k: usize,
        probes: usize,
    ) -> Result<Vec<ScoredChunk>, BackendError> {
        match self {
            VectorBackend::Local(s) => s.query(embedding, predicate, top_k, probes).await,
            VectorBackend::Remote(s) => s.query(embedding, predicate, top_k, probes).await,
        }
    }

    async fn len(&self) -> Result<usize, BackendError> {
        match self {
            VectorBackend::Local(s) => s.len().await,
            VectorBackend::Remote(s) => s.len().await,
        }
    }
}
