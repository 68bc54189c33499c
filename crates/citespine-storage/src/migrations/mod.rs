//! Versioned schema migrations. Each migration runs once, inside its own
//! transaction, and records itself in `schema_version`.

mod v001_corpus_tables;
mod v002_local_vector_index;
mod v003_manifest_log;
mod v004_corpus_digest;

use rusqlite::{params, Connection};

use citespine_core::errors::{CiteError, CiteResult, StorageError};

use crate::to_storage_err;

type MigrationFn = fn(&Connection) -> CiteResult<()>;

const MIGRATIONS: &[(u32, &str, MigrationFn)] = &[
    (1, "corpus_tables", v001_corpus_tables::migrate),
    (2, "local_vector_index", v002_local_vector_index::migrate),
    (3, "manifest_log", v003_manifest_log::migrate),
    (4, "corpus_digest", v004_corpus_digest::migrate),
];

/// Latest schema version known to this build.
pub const LATEST_VERSION: u32 = 4;

/// Apply all pending migrations.
pub fn run_migrations(conn: &Connection) -> CiteResult<u32> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version    INTEGER PRIMARY KEY,
            name       TEXT NOT NULL,
            applied_at TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let current = current_version(conn)?;
    let mut applied = 0;
    for (version, name, migrate) in MIGRATIONS {
        if *version <= current {
            continue;
        }
        apply_one(conn, *version, name, *migrate)?;
        applied += 1;
        tracing::info!(version, name, "applied migration");
    }
    Ok(applied)
}

/// Highest applied migration, or 0 on a fresh database.
pub fn current_version(conn: &Connection) -> CiteResult<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .map_err(|e| to_storage_err(e.to_string()))
}

fn apply_one(conn: &Connection, version: u32, name: &str, migrate: MigrationFn) -> CiteResult<()> {
    let failed = |reason: String| {
        CiteError::StorageError(StorageError::MigrationFailed { version, reason })
    };
    conn.execute_batch("BEGIN IMMEDIATE")
        .map_err(|e| failed(e.to_string()))?;
    let result = migrate(conn).and_then(|()| {
        conn.execute(
            "INSERT INTO schema_version (version, name) VALUES (?1, ?2)",
            params![version, name],
        )
        .map(|_| ())
        .map_err(|e| to_storage_err(e.to_string()))
    });
    match result {
        Ok(()) => conn
            .execute_batch("COMMIT")
            .map_err(|e| failed(e.to_string())),
        Err(e) => {
            let _ = conn.execute_batch("ROLLBACK");
            Err(failed(e.to_string()))
        }
    }
}
