/// Storage-layer errors for SQLite and file operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("migration failed at version {version}: {reason}")]
    MigrationFailed { version: u32, reason: String },

    #[error("I/O error at {path}: {reason}")]
    Io { path: String, reason: String },
}
