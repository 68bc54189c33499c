//! v001: document_versions, chunks.

use rusqlite::Connection;

use citespine_core::errors::CiteResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CiteResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS document_versions (
            version_id     TEXT PRIMARY KEY,
            family_id      TEXT NOT NULL,
            effective_date TEXT NOT NULL,
            superseded_by  TEXT,
            UNIQUE (family_id, effective_date)
        );

        CREATE INDEX IF NOT EXISTS idx_versions_family
            ON document_versions(family_id, effective_date);

        CREATE TABLE IF NOT EXISTS chunks (
            id              TEXT PRIMARY KEY,
            family_id       TEXT NOT NULL,
            version_id      TEXT NOT NULL REFERENCES document_versions(version_id),
            section_path    TEXT NOT NULL,
            page_start      INTEGER NOT NULL,
            page_end        INTEGER NOT NULL,
            framework       TEXT NOT NULL,
            jurisdiction    TEXT NOT NULL,
            doc_type        TEXT NOT NULL,
            authority_level TEXT NOT NULL,
            effective_date  TEXT NOT NULL,
            text            TEXT NOT NULL,
            token_count     INTEGER NOT NULL,
            content_hash    TEXT NOT NULL,
            ingested_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
        );

        CREATE INDEX IF NOT EXISTS idx_chunks_version ON chunks(version_id);
        CREATE INDEX IF NOT EXISTS idx_chunks_family ON chunks(family_id);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
