//! # citespine-core
//!
//! Foundation crate for the CiteSpine retrieval-and-grounding engine.
//! Defines all types, traits, errors, config, and constants.
//! Every other crate in the workspace depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod models;
pub mod traits;

// Re-export the most commonly used types at the crate root.
pub use config::CiteConfig;
pub use errors::{CiteError, CiteResult};
pub use models::{
    BackendIdentity, Chunk, ChunkMetadata, FilterPredicate, PageSpan, RawFilters,
    ResolvedPredicate, RetrievalCandidate, ScoredChunk,
};
