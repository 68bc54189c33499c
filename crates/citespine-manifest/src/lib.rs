//! # citespine-manifest
//!
//! Every query and generate call is wrapped by [`ManifestRecorder`], which
//! persists an immutable [`Manifest`](citespine_core::models::Manifest) only
//! after the call completes. Replay reissues the recorded normalized inputs
//! and [`compare`] judges the result: exact chunk-id sequence plus
//! normalized edit similarity of the answer text.

pub mod directory;
pub mod hashing;
pub mod recorder;
pub mod replay;
pub mod similarity;

pub use directory::DirectoryManifestStore;
pub use hashing::{canonical_json, output_hash};
pub use recorder::{CallRecord, ManifestRecorder};
pub use replay::{compare, ReplayObservation};
pub use similarity::{levenshtein, normalized_similarity};
