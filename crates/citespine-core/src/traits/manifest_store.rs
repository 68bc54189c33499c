use crate::errors::CiteResult;
use crate::models::Manifest;

/// Append-only manifest persistence.
pub trait IManifestStore: Send + Sync {
    /// Persist a new manifest. Fails with `ManifestError::DuplicateId` if the
    /// id already exists; an existing record is never overwritten.
    fn append(&self, manifest: &Manifest) -> CiteResult<()>;

    fn get(&self, id: &str) -> CiteResult<Option<Manifest>>;

    /// Ids in creation order.
    fn list_ids(&self) -> CiteResult<Vec<String>>;
}
