//! # citespine-engine
//!
//! `CiteEngine` owns every subsystem and exposes the five entry points:
//! `ingest`, `query`, `generate`, `replay`, and `parity`. Query and generate
//! run inside the manifest recorder; replay and parity are read-only.

mod generate;
mod ingest;
mod parity;
mod query;
mod replay;
pub mod responses;
pub mod runtime;

pub use responses::{GenerateResponse, IngestReceipt, QueryMetrics, QueryResponse};
pub use runtime::{CiteEngine, RuntimeOptions};
