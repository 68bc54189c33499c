//! chunks CRUD and corpus hashing.
//!
//! The corpus hash is kept incrementally in `corpus_digest`: each chunk
//! contributes blake3(id, content_hash, version_id), XOR-folded into a
//! 32-byte accumulator. Upserts swap the old contribution for the new one
//! in the same savepoint, so reading the hash never scans the corpus.

use rusqlite::{params, Connection, OptionalExtension, Row};

use citespine_core::errors::CiteResult;
use citespine_core::models::{Chunk, ChunkMetadata, PageSpan};

use super::{format_date, parse_date};
use crate::to_storage_err;

const CHUNK_COLUMNS: &str = "id, family_id, version_id, section_path, page_start, page_end,
    framework, jurisdiction, doc_type, authority_level, effective_date,
    text, token_count, content_hash";

/// Whether an upsert created, changed, or left a chunk untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
    Unchanged,
}

/// Insert or replace a chunk by id. Re-ingesting identical content is a no-op.
pub fn upsert_chunk(conn: &Connection, chunk: &Chunk) -> CiteResult<UpsertOutcome> {
    let existing: Option<(String, String)> = conn
        .query_row(
            "SELECT content_hash, version_id FROM chunks WHERE id = ?1",
            params![chunk.id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;

    let outcome = match existing {
        Some((ref hash, _)) if *hash == chunk.content_hash => return Ok(UpsertOutcome::Unchanged),
        Some(_) => UpsertOutcome::Updated,
        None => UpsertOutcome::Inserted,
    };

    let m = &chunk.metadata;
    conn.execute(
        "INSERT INTO chunks (id, family_id, version_id, section_path, page_start, page_end,
            framework, jurisdiction, doc_type, authority_level, effective_date,
            text, token_count, content_hash)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)
         ON CONFLICT(id) DO UPDATE SET
            family_id = excluded.family_id,
            version_id = excluded.version_id,
            section_path = excluded.section_path,
            page_start = excluded.page_start,
            page_end = excluded.page_end,
            framework = excluded.framework,
            jurisdiction = excluded.jurisdiction,
            doc_type = excluded.doc_type,
            authority_level = excluded.authority_level,
            effective_date = excluded.effective_date,
            text = excluded.text,
            token_count = excluded.token_count,
            content_hash = excluded.content_hash",
        params![
            chunk.id,
            m.family_id,
            m.version_id,
            chunk.section_path,
            chunk.page_span.start,
            chunk.page_span.end,
            m.framework,
            m.jurisdiction,
            m.doc_type,
            m.authority_level,
            format_date(m.effective_date),
            chunk.text,
            chunk.token_count as i64,
            chunk.content_hash,
        ],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;

    let mut digest = load_corpus_digest(conn)?;
    match existing {
        Some((old_hash, old_version)) => digest.toggle(&chunk.id, &old_hash, &old_version),
        None => digest.chunk_count += 1,
    }
    digest.toggle(&chunk.id, &chunk.content_hash, &m.version_id);
    store_corpus_digest(conn, &digest)?;
    Ok(outcome)
}

pub fn get_chunk(conn: &Connection, id: &str) -> CiteResult<Option<Chunk>> {
    let sql = format!("SELECT {CHUNK_COLUMNS} FROM chunks WHERE id = ?1");
    let raw = conn
        .query_row(&sql, params![id], raw_chunk)
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    raw.map(RawChunk::into_chunk).transpose()
}

/// Fetch chunks preserving the order of `ids`; unknown ids are skipped.
pub fn get_chunks(conn: &Connection, ids: &[String]) -> CiteResult<Vec<Chunk>> {
    let sql = format!("SELECT {CHUNK_COLUMNS} FROM chunks WHERE id = ?1");
    let mut stmt = conn
        .prepare_cached(&sql)
        .map_err(|e| to_storage_err(e.to_string()))?;
    let mut chunks = Vec::with_capacity(ids.len());
    for id in ids {
        let raw = stmt
            .query_row(params![id], raw_chunk)
            .optional()
            .map_err(|e| to_storage_err(e.to_string()))?;
        if let Some(raw) = raw {
            chunks.push(raw.into_chunk()?);
        }
    }
    Ok(chunks)
}

pub fn count_chunks(conn: &Connection) -> CiteResult<usize> {
    conn.query_row("SELECT COUNT(*) FROM chunks", [], |row| row.get::<_, i64>(0))
        .map(|n| n as usize)
        .map_err(|e| to_storage_err(e.to_string()))
}

/// Order-independent fingerprint of the chunk table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorpusDigest {
    pub chunk_count: u64,
    pub accumulator: [u8; 32],
}

impl CorpusDigest {
    /// Add or remove one chunk's contribution.
    fn toggle(&mut self, id: &str, content_hash: &str, version_id: &str) {
        let mut hasher = blake3::Hasher::new();
        hasher.update(id.as_bytes());
        hasher.update(b"\x1f");
        hasher.update(content_hash.as_bytes());
        hasher.update(b"\x1f");
        hasher.update(version_id.as_bytes());
        let entry = hasher.finalize();
        for (acc, byte) in self.accumulator.iter_mut().zip(entry.as_bytes()) {
            *acc ^= byte;
        }
    }

    pub fn to_hex(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.chunk_count.to_le_bytes());
        hasher.update(&self.accumulator);
        hasher.finalize().to_hex().to_string()
    }
}

/// Current corpus hash, read from the maintained digest.
pub fn corpus_hash(conn: &Connection) -> CiteResult<String> {
    Ok(load_corpus_digest(conn)?.to_hex())
}

/// Rebuild the digest from every chunk row. Used to seed the table and to
/// check the maintained value.
pub fn fold_corpus_digest(conn: &Connection) -> CiteResult<CorpusDigest> {
    let mut stmt = conn
        .prepare("SELECT id, content_hash, version_id FROM chunks")
        .map_err(|e| to_storage_err(e.to_string()))?;
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .map_err(|e| to_storage_err(e.to_string()))?;

    let mut digest = CorpusDigest::default();
    for row in rows {
        let (id, content_hash, version_id) = row.map_err(|e| to_storage_err(e.to_string()))?;
        digest.chunk_count += 1;
        digest.toggle(&id, &content_hash, &version_id);
    }
    Ok(digest)
}

pub fn load_corpus_digest(conn: &Connection) -> CiteResult<CorpusDigest> {
    let stored: Option<(i64, Vec<u8>)> = conn
        .query_row(
            "SELECT chunk_count, digest FROM corpus_digest WHERE id = 1",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()
        .map_err(|e| to_storage_err(e.to_string()))?;
    let Some((count, bytes)) = stored else {
        return Ok(CorpusDigest::default());
    };
    let accumulator: [u8; 32] = bytes
        .try_into()
        .map_err(|b: Vec<u8>| to_storage_err(format!("corpus digest has {} bytes", b.len())))?;
    Ok(CorpusDigest {
        chunk_count: count.max(0) as u64,
        accumulator,
    })
}

pub fn store_corpus_digest(conn: &Connection, digest: &CorpusDigest) -> CiteResult<()> {
    conn.execute(
        "INSERT INTO corpus_digest (id, chunk_count, digest) VALUES (1, ?1, ?2)
         ON CONFLICT(id) DO UPDATE SET
            chunk_count = excluded.chunk_count,
            digest = excluded.digest",
        params![digest.chunk_count as i64, &digest.accumulator[..]],
    )
    .map_err(|e| to_storage_err(e.to_string()))?;
    Ok(())
}

struct RawChunk {
    id: String,
    family_id: String,
    version_id: String,
    section_path: String,
    page_start: u32,
    page_end: u32,
    framework: String,
    jurisdiction: String,
    doc_type: String,
    authority_level: String,
    effective_date: String,
    text: String,
    token_count: i64,
    content_hash: String,
}

impl RawChunk {
    fn into_chunk(self) -> CiteResult<Chunk> {
        Ok(Chunk {
            id: self.id,
            text: self.text,
            section_path: self.section_path,
            page_span: PageSpan::new(self.page_start, self.page_end),
            metadata: ChunkMetadata {
                framework: self.framework,
                jurisdiction: self.jurisdiction,
                doc_type: self.doc_type,
                authority_level: self.authority_level,
                family_id: self.family_id,
                version_id: self.version_id,
                effective_date: parse_date(&self.effective_date)?,
            },
            token_count: self.token_count.max(0) as usize,
            content_hash: self.content_hash,
        })
    }
}

fn raw_chunk(row: &Row<'_>) -> rusqlite::Result<RawChunk> {
    Ok(RawChunk {
        id: row.get(0)?,
        family_id: row.get(1)?,
        version_id: row.get(2)?,
        section_path: row.get(3)?,
        page_start: row.get(4)?,
        page_end: row.get(5)?,
        framework: row.get(6)?,
        jurisdiction: row.get(7)?,
        doc_type: row.get(8)?,
        authority_level: row.get(9)?,
        effective_date: row.get(10)?,
        text: row.get(11)?,
        token_count: row.get(12)?,
        content_hash: row.get(13)?,
    })
}
