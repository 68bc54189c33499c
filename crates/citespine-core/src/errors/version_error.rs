/// Document-version table errors, raised when building the interval table.
#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    #[error("family {family_id} has two versions effective on {date}")]
    DuplicateEffectiveDate { family_id: String, date: String },

    #[error("version {version_id} registered more than once")]
    DuplicateVersionId { version_id: String },

    #[error("version {version_id} supersedes itself")]
    SelfSupersession { version_id: String },
}
