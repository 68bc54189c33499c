//! # citespine-embeddings
//!
//! Query embedding for retrieval. Two providers sit behind `IQueryEmbedder`:
//! a deterministic feature-hashing embedder that works air-gapped, and a
//! client for a remote embedding API. `CachedEmbedder` adds a content-hash
//! keyed in-memory cache in front of either.

mod cache;
mod provider;
pub mod providers;

pub use cache::{CachedEmbedder, QueryEmbeddingCache};
pub use provider::EmbeddingProvider;
pub use providers::{ApiEmbedder, HashedEmbedder};
