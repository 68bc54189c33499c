//! # citespine-retrieval
//!
//! Request path from raw caller filters to ranked, predicate-checked
//! candidates:
//!
//! ```text
//! RawFilters ──FilterNormalizer──▶ FilterPredicate
//!            ──VersionResolver───▶ ResolvedPredicate (exact version ids)
//!            ──IVectorStore──────▶ ScoredChunk*  (retry / timeout / semaphore)
//!            ──ranking───────────▶ RetrievalCandidate*
//! ```

pub mod normalizer;
pub mod ranking;
pub mod router;
pub mod vocabulary;

pub use normalizer::FilterNormalizer;
pub use router::{Retrieval, RetrievalRouter};
pub use vocabulary::Vocabulary;
