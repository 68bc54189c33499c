/// CiteSpine version string.
pub const CITESPINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Dimensionality of every stored and query embedding.
pub const EMBEDDING_DIMENSIONS: usize = 384;

/// Answer text returned when nothing in the candidate set supports a claim.
pub const NO_EVIDENCE_ANSWER: &str = "No evidence found in the specified corpus and filters.";

/// Display snippets attached to citations are truncated to this many characters.
pub const MAX_CITATION_SNIPPET_CHARS: usize = 280;

/// Flag reason attached to artifact fields that could not be grounded.
pub const UNGROUNDED_FLAG: &str = "ungrounded";

/// Name of the built-in artifact schema.
pub const MEMO_SCHEMA: &str = "memo";

/// Filter key carrying the point-in-time date.
pub const AS_OF_KEY: &str = "as_of";

/// Backend identity kinds.
pub const BACKEND_LOCAL: &str = "local";
pub const BACKEND_REMOTE: &str = "remote";
