use crate::errors::CiteResult;
use crate::models::Chunk;

/// Read access to chunk text and corpus identity.
pub trait IChunkSource: Send + Sync {
    /// Chunks for the given ids, in the order given. Unknown ids are skipped.
    fn get_chunks(&self, ids: &[String]) -> CiteResult<Vec<Chunk>>;

    /// Digest over the whole chunk store; changes whenever any chunk changes.
    fn corpus_hash(&self) -> CiteResult<String>;
}
