//! Append-only manifest log.

use rusqlite::{params, Connection, ErrorCode, OptionalExtension};

use citespine_core::errors::{CiteResult, ManifestError};
use citespine_core::models::Manifest;

use crate::to_storage_err;

/// Insert a manifest. The UNIQUE constraint on `id` makes creation atomic:
/// a concurrent duplicate fails instead of overwriting.
pub fn insert_manifest(conn: &Connection, manifest: &Manifest) -> CiteResult<()> {
    let body = serde_json::to_string(manifest)?;
    let result = conn.execute(
        "INSERT INTO manifests (id, operation, backend, output_hash, created_at, body)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            manifest.id,
            manifest.operation.as_str(),
            manifest.backend.to_string(),
            manifest.output_hash,
            manifest.created_at.to_rfc3339(),
            body,
        ],
    );
    match result {
        Ok(_) => Ok(()),
        Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
            Err(ManifestError::DuplicateId {
                id: manifest.id.clone(),
            }
            .into())
        }
        Err(e) => Err(to_storage_err(e.to_string())),
    }
}

pub fn get_manifest(conn: &Connection, id: &str) -> CiteResult<Option<Manifest>> {
    let body: Option<String> = conn
        .query_row(
            "SELECT body FROM manifests WHERE id = ?1",
            params![id],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    body.map(|b| {
        serde_json::from_str(&b).map_err(|e| {
            ManifestError::Corrupt {
                id: id.to_string(),
                reason: e.to_string(),
            }
            .into()
        })
    })
    .transpose()
}

pub fn list_manifest_ids(conn: &Connection) -> CiteResult<Vec<String>> {
    let mut stmt = conn
        .prepare("SELECT id FROM manifests ORDER BY seq")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .map_err(|e| to_storage_err(e.to_string()))?;
    rows.collect::<Result<Vec<_>, _>>()
        .map_err(|e| to_storage_err(e.to_string()))
}
