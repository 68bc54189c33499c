/// Manifest persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("manifest {id} already exists")]
    DuplicateId { id: String },

    #[error("manifest {id} could not be written: {reason}")]
    WriteFailed { id: String, reason: String },

    #[error("manifest {id} is corrupt: {reason}")]
    Corrupt { id: String, reason: String },
}
