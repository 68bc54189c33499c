//! v002: local_vectors (partitioned embedding index), local_index_meta.

use rusqlite::Connection;

use citespine_core::errors::CiteResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CiteResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS local_vectors (
            chunk_id        TEXT PRIMARY KEY,
            partition       INTEGER NOT NULL,
            dimensions      INTEGER NOT NULL,
            embedding       BLOB NOT NULL,
            framework       TEXT NOT NULL,
            jurisdiction    TEXT NOT NULL,
            doc_type        TEXT NOT NULL,
            authority_level TEXT NOT NULL,
            family_id       TEXT NOT NULL,
            version_id      TEXT NOT NULL,
            effective_date  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_local_vectors_partition ON local_vectors(partition);
        CREATE INDEX IF NOT EXISTS idx_local_vectors_version ON local_vectors(version_id);

        CREATE TABLE IF NOT EXISTS local_index_meta (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
