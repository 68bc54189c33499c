//! v003: manifests (append-only), degradation_log.

use rusqlite::Connection;

use citespine_core::errors::CiteResult;

use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CiteResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS manifests (
            seq         INTEGER PRIMARY KEY AUTOINCREMENT,
            id          TEXT NOT NULL UNIQUE,
            operation   TEXT NOT NULL,
            backend     TEXT NOT NULL,
            output_hash TEXT NOT NULL,
            created_at  TEXT NOT NULL,
            body        TEXT NOT NULL
        );

        CREATE TRIGGER IF NOT EXISTS manifests_no_update
            BEFORE UPDATE ON manifests
        BEGIN
            SELECT RAISE(ABORT, 'manifests are append-only');
        END;

        CREATE TRIGGER IF NOT EXISTS manifests_no_delete
            BEFORE DELETE ON manifests
        BEGIN
            SELECT RAISE(ABORT, 'manifests are append-only');
        END;

        CREATE TABLE IF NOT EXISTS degradation_log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            component TEXT NOT NULL,
            failure   TEXT NOT NULL,
            fallback  TEXT NOT NULL,
            timestamp TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_degradation_component ON degradation_log(component);
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}
