//! document_versions CRUD.

use rusqlite::{params, Connection, OptionalExtension};

use citespine_core::errors::{CiteResult, VersionError};
use citespine_core::models::DocumentVersion;

use super::{format_date, parse_date};
use crate::to_storage_err;

/// Insert a version, or refresh its `superseded_by` if it already exists.
/// Re-registering an id under a different family or date is rejected.
pub fn upsert_version(conn: &Connection, version: &DocumentVersion) -> CiteResult<()> {
    if let Some(existing) = get_version(conn, &version.version_id)? {
        if existing.family_id != version.family_id
            || existing.effective_date != version.effective_date
        {
            return Err(VersionError::DuplicateVersionId {
                version_id: version.version_id.clone(),
            }
            .into());
        }
        if version.superseded_by.is_some() && existing.superseded_by != version.superseded_by {
            conn.execute(
                "UPDATE document_versions SET superseded_by = ?2 WHERE version_id = ?1",
                params![version.version_id, version.superseded_by],
            )
            .map_err(|e| to_storage_err(e.to_string()))?;
        }
        return Ok(());
    }

    let clash: Option<String> = conn
        .query_row(
            "SELECT version_id FROM document_versions
             WHERE family_id = ?1 AND effective_date = ?2",
            params![version.family_id, format_date(version.effective_date)],
            |row| row.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    if clash.is_some() {
        return Err(VersionError::DuplicateEffectiveDate {
            family_id: version.family_id.clone(),
            date: format_date(version.effective_date),
        }
        .into());
    }

    conn.execute(
        "INSERT INTO document_versions (version_id, family_id, effective_date, superseded_by)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            version.version_id,
            version.family_id,
            format_date(version.effective_date),
            version.superseded_by,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn get_version(conn: &Connection, version_id: &str) -> CiteResult<Option<DocumentVersion>> {
    let row = conn
        .query_row(
            "SELECT version_id, family_id, effective_date, superseded_by
             FROM document_versions WHERE version_id = ?1",
            params![version_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, Option<String>>(3)?,
                ))
            },
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    row.map(|(version_id, family_id, date, superseded_by)| {
        Ok(DocumentVersion {
            version_id,
            family_id,
            effective_date: parse_date(&date)?,
            superseded_by,
        })
    })
    .transpose()
}

/// All versions ordered by family then effective date.
pub fn list_versions(conn: &Connection) -> CiteResult<Vec<DocumentVersion>> {
    let mut stmt = conn
        .prepare(
            "SELECT version_id, family_id, effective_date, superseded_by
             FROM document_versions ORDER BY family_id, effective_date",
        )
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut versions = Vec::new();
    for row in rows {
        let (version_id, family_id, date, superseded_by) =
            row.map_err(|e| to_storage_err(e.to_string()))?;
        versions.push(DocumentVersion {
            version_id,
            family_id,
            effective_date: parse_date(&date)?,
            superseded_by,
        });
    }
    Ok(versions)
}
