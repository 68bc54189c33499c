mod answer;
mod artifact;
mod chunk;
mod citation;
mod degradation_event;
mod document_version;
mod filter;
mod ingest;
mod manifest;
mod parity;
mod retrieval;

pub use answer::{AnswerOutcome, ComposedAnswer};
pub use artifact::{ArtifactSchema, FieldFlag, FilledArtifact, SchemaField, SourceMapEntry};
pub use chunk::{Chunk, ChunkMetadata, PageSpan};
pub use citation::{Citation, Claim, HighlightSpan};
pub use degradation_event::DegradationEvent;
pub use document_version::DocumentVersion;
pub use filter::{FilterDimension, FilterPredicate, RawFilters, ResolvedPredicate};
pub use ingest::IngestRecord;
pub use manifest::{
    BackendIdentity, Manifest, NormalizedInputs, OperationKind, ReplayReport,
};
pub use parity::{CoverageAggregate, ParityQuery, ParityReport, QueryCoverage};
pub use retrieval::{RetrievalCandidate, ScoredChunk};
