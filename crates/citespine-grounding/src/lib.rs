//! # citespine-grounding
//!
//! Turns ranked candidates into output where every sentence or field points
//! at the passage that supports it.
//!
//! - [`sentences`]: abbreviation-aware splitting with character offsets
//! - [`terms`]: content-term extraction (stop-words, light stemming)
//! - [`scorer`]: `LexicalEntailmentScorer`
//! - [`composer`]: `EvidenceComposer` and the no-evidence guard
//! - [`filler`]: `ArtifactFiller` with per-field source maps
//! - [`schema`]: built-in and configured artifact schemas

pub mod composer;
pub mod evidence;
pub mod filler;
pub mod schema;
pub mod scorer;
pub mod sentences;
pub mod terms;

pub use composer::EvidenceComposer;
pub use evidence::{normalize_snippet, EvidenceSpan};
pub use filler::ArtifactFiller;
pub use schema::SchemaRegistry;
pub use scorer::LexicalEntailmentScorer;
