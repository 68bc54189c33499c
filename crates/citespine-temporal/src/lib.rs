//! # citespine-temporal
//!
//! Answers "which version of this document was in force on date D?".
//!
//! ```text
//!   family ──► [ (2017-01-01, v2017), (2021-01-01, v2021) ]   sorted, unique dates
//!                        │
//!   resolve(family, 2019-01-01) ──► partition_point(date <= as_of) - 1 ──► v2017
//! ```
//!
//! Resolution runs before similarity ranking: the router hands backends the
//! exact set of eligible version ids, so later versions never compete.

mod registry;
mod resolver;

pub use registry::VersionRegistry;
pub use resolver::VersionResolver;
