mod backend_error;
mod cite_error;
mod embedding_error;
mod manifest_error;
mod storage_error;
mod version_error;

pub use backend_error::BackendError;
pub use cite_error::{CiteError, CiteResult};
pub use embedding_error::EmbeddingError;
pub use manifest_error::ManifestError;
pub use storage_error::StorageError;
pub use version_error::VersionError;
