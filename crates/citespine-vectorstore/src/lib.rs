//! # citespine-vectorstore
//!
//! Two interchangeable `IVectorStore` implementations with identical
//! predicate semantics:
//!
//! ```text
//!   LocalVectorStore   SQLite `local_vectors`, seeded hyperplane partitions,
//!                      predicate compiled into the scan's WHERE clause
//!   RemoteVectorStore  hosted index over IRemoteTransport, predicate sent as
//!                      a $eq / $in / $lte metadata filter
//! ```
//!
//! Backends never retry; retry and timeout policy belong to the router.

pub mod factory;
pub mod local;
pub mod remote;
pub mod similarity;

pub use factory::VectorBackend;
pub use local::LocalVectorStore;
pub use remote::{
    HttpTransport, IRemoteTransport, LoopbackTransport, RemoteTransport, RemoteVectorStore,
};

use citespine_core::errors::BackendError;

pub(crate) fn check_dimensions(expected: usize, actual: usize) -> Result<(), BackendError> {
    if expected == actual {
        Ok(())
    } else {
        Err(BackendError::DimensionMismatch { expected, actual })
    }
}
