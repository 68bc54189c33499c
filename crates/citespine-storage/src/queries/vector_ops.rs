//! local_vectors table: partitioned embedding storage with predicate-aware scans.

use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use citespine_core::errors::CiteResult;
use citespine_core::models::{ChunkMetadata, ResolvedPredicate};

use super::{format_date, parse_date};
use crate::to_storage_err;

const VECTOR_COLUMNS: &str = "chunk_id, partition, embedding, framework, jurisdiction,
    doc_type, authority_level, family_id, version_id, effective_date";

/// One stored vector with the metadata the local backend filters on.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorRow {
    pub chunk_id: String,
    pub partition: u32,
    pub embedding: Vec<f32>,
    pub metadata: ChunkMetadata,
}

/// Insert or replace a vector. Returns false when the stored row was identical.
pub fn upsert_vector(conn: &Connection, row: &VectorRow) -> CiteResult<bool> {
    let blob = f32_vec_to_bytes(&row.embedding);
    let m = &row.metadata;
    let date = format_date(m.effective_date);

    let unchanged: Option<i64> = conn
        .query_row(
            "SELECT 1 FROM local_vectors
             WHERE chunk_id = ?1 AND partition = ?2 AND embedding = ?3
               AND framework = ?4 AND jurisdiction = ?5 AND doc_type = ?6
               AND authority_level = ?7 AND family_id = ?8 AND version_id = ?9
               AND effective_date = ?10",
            params![
                row.chunk_id,
                row.partition,
                blob,
                m.framework,
                m.jurisdiction,
                m.doc_type,
                m.authority_level,
                m.family_id,
                m.version_id,
                date,
            ],
            |r| r.get(0),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    if unchanged.is_some() {
        return Ok(false);
    }

    conn.execute(
        "INSERT INTO local_vectors (chunk_id, partition, dimensions, embedding, framework,
            jurisdiction, doc_type, authority_level, family_id, version_id, effective_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
         ON CONFLICT(chunk_id) DO UPDATE SET
            partition = excluded.partition,
            dimensions = excluded.dimensions,
            embedding = excluded.embedding,
            framework = excluded.framework,
            jurisdiction = excluded.jurisdiction,
            doc_type = excluded.doc_type,
            authority_level = excluded.authority_level,
            family_id = excluded.family_id,
            version_id = excluded.version_id,
            effective_date = excluded.effective_date",
        params![
            row.chunk_id,
            row.partition,
            row.embedding.len() as i64,
            blob,
            m.framework,
            m.jurisdiction,
            m.doc_type,
            m.authority_level,
            m.family_id,
            m.version_id,
            date,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(true)
}

/// Rows in the given partitions that satisfy `predicate`. The predicate is
/// part of the SQL, so non-matching rows are never materialized.
pub fn scan_partitions(
    conn: &Connection,
    partitions: &[u32],
    predicate: &ResolvedPredicate,
) -> CiteResult<Vec<VectorRow>> {
    if partitions.is_empty() || predicate.is_empty() {
        return Ok(Vec::new());
    }

    let mut clauses: Vec<String> = Vec::new();
    let mut args: Vec<Value> = Vec::new();

    clauses.push(format!("partition IN ({})", placeholders(partitions.len())));
    args.extend(partitions.iter().map(|p| Value::Integer(i64::from(*p))));

    clauses.push(format!(
        "version_id IN ({})",
        placeholders(predicate.version_ids.len())
    ));
    args.extend(predicate.version_ids.iter().cloned().map(Value::Text));

    clauses.push("effective_date <= ?".to_string());
    args.push(Value::Text(format_date(predicate.filters.as_of)));

    for (dimension, value) in predicate.filters.constraints() {
        clauses.push(format!("{} = ?", dimension.key()));
        args.push(Value::Text(value.to_string()));
    }

    let sql = format!(
        "SELECT {VECTOR_COLUMNS} FROM local_vectors WHERE {} ORDER BY chunk_id",
        clauses.join(" AND ")
    );
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map(params_from_iter(args), raw_vector)
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))?.into_row()?);
    }
    Ok(out)
}

/// Every stored vector, for repartitioning.
pub fn all_vectors(conn: &Connection) -> CiteResult<Vec<VectorRow>> {
    let sql = format!("SELECT {VECTOR_COLUMNS} FROM local_vectors ORDER BY chunk_id");
    let mut stmt = conn
        .prepare(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], raw_vector)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut out = Vec::new();
    for row in rows {
        out.push(row.map_err(|e| to_storage_err(e.to_string()))?.into_row()?);
    }
    Ok(out)
}

pub fn set_partition(conn: &Connection, chunk_id: &str, partition: u32) -> CiteResult<()> {
    conn.execute(
        "UPDATE local_vectors SET partition = ?2 WHERE chunk_id = ?1",
        params![chunk_id, partition],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

pub fn count_vectors(conn: &Connection) -> CiteResult<usize> {
    conn.query_row("SELECT COUNT(*) FROM local_vectors", [], |row| {
        row.get::<_, i64>(0)
    })
    .map(|n| n as usize)
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn get_meta(conn: &Connection, key: &str) -> CiteResult<Option<String>> {
    conn.query_row(
        "SELECT value FROM local_index_meta WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .map_err(|e| to_storage_err(e.to_string()))
}

pub fn set_meta(conn: &Connection, key: &str, value: &str) -> CiteResult<()> {
    conn.execute(
        "INSERT INTO local_index_meta (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

/// Convert f32 slice to bytes (little-endian).
pub fn f32_vec_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert little-endian bytes back to f32s. Trailing partial values are dropped.
pub fn bytes_to_f32_vec(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

fn placeholders(n: usize) -> String {
    vec!["?"; n].join(", ")
}

struct RawVector {
    chunk_id: String,
    partition: u32,
    embedding: Vec<u8>,
    framework: String,
    jurisdiction: String,
    doc_type: String,
    authority_level: String,
    family_id: String,
    version_id: String,
    effective_date: String,
}

impl RawVector {
    fn into_row(self) -> CiteResult<VectorRow> {
        Ok(VectorRow {
            chunk_id: self.chunk_id,
            partition: self.partition,
            embedding: bytes_to_f32_vec(&self.embedding),
            metadata: ChunkMetadata {
                framework: self.framework,
                jurisdiction: self.jurisdiction,
                doc_type: self.doc_type,
                authority_level: self.authority_level,
                family_id: self.family_id,
                version_id: self.version_id,
                effective_date: parse_date(&self.effective_date)?,
            },
        })
    }
}

fn raw_vector(row: &Row<'_>) -> rusqlite::Result<RawVector> {
    Ok(RawVector {
        chunk_id: row.get(0)?,
        partition: row.get(1)?,
        embedding: row.get(2)?,
        framework: row.get(3)?,
        jurisdiction: row.get(4)?,
        doc_type: row.get(5)?,
        authority_level: row.get(6)?,
        family_id: row.get(7)?,
        version_id: row.get(8)?,
        effective_date: row.get(9)?,
    })
}
