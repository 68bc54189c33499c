//! v004: corpus_digest, the running corpus fingerprint, seeded from any
//! chunks already on disk.

use rusqlite::Connection;

use citespine_core::errors::CiteResult;

use crate::queries::chunk_ops;
use crate::to_storage_err;

pub fn migrate(conn: &Connection) -> CiteResult<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS corpus_digest (
            id          INTEGER PRIMARY KEY CHECK (id = 1),
            chunk_count INTEGER NOT NULL,
            digest      BLOB NOT NULL
        );
        ",
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    let digest = chunk_ops::fold_corpus_digest(conn)?;
    chunk_ops::store_corpus_digest(conn, &digest)
}
