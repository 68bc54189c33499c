//! # citespine-parity
//!
//! Runs one query set through two retrieval routers that share filter
//! normalization and version resolution, and reports how far their top-k
//! results agree.

pub mod evaluator;
pub mod stats;

pub use evaluator::ParityEvaluator;
pub use stats::{aggregate, compare_top_k, nearest_rank};
