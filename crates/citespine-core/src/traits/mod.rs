mod chunk_source;
mod embedder;
mod evidence;
mod manifest_store;
mod vector_store;

pub use chunk_source::IChunkSource;
pub use embedder::IQueryEmbedder;
pub use evidence::{IAnswerRewriter, IEvidenceScorer};
pub use manifest_store::IManifestStore;
pub use vector_store::IVectorStore;
