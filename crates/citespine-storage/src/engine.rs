//! StorageEngine: owns the ConnectionPool, runs migrations, and implements
//! IChunkSource + IManifestStore.

use std::path::Path;

use rusqlite::Connection;

use citespine_core::config::StorageConfig;
use citespine_core::errors::CiteResult;
use citespine_core::models::{Chunk, DegradationEvent, DocumentVersion, Manifest};
use citespine_core::traits::{IChunkSource, IManifestStore};

use crate::migrations;
use crate::pool::ConnectionPool;
use crate::queries::chunk_ops::{self, UpsertOutcome};
use crate::queries::{degradation_ops, manifest_ops, version_ops};
use crate::to_storage_err;

pub struct StorageEngine {
    pool: ConnectionPool,
    /// False in in-memory mode, where reads go through the writer because
    /// in-memory read connections are separate databases.
    use_read_pool: bool,
}

impl StorageEngine {
    /// Open a storage engine backed by a file on disk with default settings.
    pub fn open(path: &Path) -> CiteResult<Self> {
        let defaults = StorageConfig::default();
        Self::open_with(path, defaults.read_pool_size, defaults.busy_timeout_ms)
    }

    /// Open the database named by the storage config.
    pub fn open_with_config(config: &StorageConfig) -> CiteResult<Self> {
        Self::open_with(
            Path::new(&config.db_path),
            config.read_pool_size,
            config.busy_timeout_ms,
        )
    }

    fn open_with(path: &Path, read_pool_size: usize, busy_timeout_ms: u32) -> CiteResult<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| to_storage_err(e.to_string()))?;
        }
        let pool = ConnectionPool::open(path, read_pool_size, busy_timeout_ms)?;
        let engine = Self {
            pool,
            use_read_pool: true,
        };
        engine.initialize()?;
        Ok(engine)
    }

    /// Open an in-memory storage engine (for testing).
    pub fn open_in_memory() -> CiteResult<Self> {
        let pool = ConnectionPool::open_in_memory()?;
        let engine = Self {
            pool,
            use_read_pool: false,
        };
        engine.initialize()?;
        Ok(engine)
    }

    fn initialize(&self) -> CiteResult<()> {
        self.pool.writer.with_conn(|conn| {
            let applied = migrations::run_migrations(conn)?;
            tracing::debug!(applied, "storage initialized");
            Ok(())
        })
    }

    pub fn pool(&self) -> &ConnectionPool {
        &self.pool
    }

    /// Identity string for manifests: the database path, or `:memory:`.
    pub fn instance_id(&self) -> String {
        self.pool
            .db_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| ":memory:".to_string())
    }

    /// Execute a read-only query on the best available connection.
    pub fn with_reader<F, T>(&self, f: F) -> CiteResult<T>
    where
        F: FnOnce(&Connection) -> CiteResult<T>,
    {
        if self.use_read_pool {
            self.pool.readers.with_conn(f)
        } else {
            self.pool.writer.with_conn(f)
        }
    }

    pub fn with_writer<F, T>(&self, f: F) -> CiteResult<T>
    where
        F: FnOnce(&Connection) -> CiteResult<T>,
    {
        self.pool.writer.with_conn(f)
    }

    /// Register the chunk's version and upsert the chunk, all-or-nothing.
    pub fn ingest_chunk(&self, chunk: &Chunk, version: &DocumentVersion) -> CiteResult<UpsertOutcome> {
        self.with_writer(|conn| {
            with_savepoint(conn, "ingest_chunk", |conn| {
                version_ops::upsert_version(conn, version)?;
                chunk_ops::upsert_chunk(conn, chunk)
            })
        })
    }

    pub fn register_version(&self, version: &DocumentVersion) -> CiteResult<()> {
        self.with_writer(|conn| version_ops::upsert_version(conn, version))
    }

    pub fn get_chunk(&self, id: &str) -> CiteResult<Option<Chunk>> {
        self.with_reader(|conn| chunk_ops::get_chunk(conn, id))
    }

    pub fn chunk_count(&self) -> CiteResult<usize> {
        self.with_reader(chunk_ops::count_chunks)
    }

    pub fn list_versions(&self) -> CiteResult<Vec<DocumentVersion>> {
        self.with_reader(version_ops::list_versions)
    }

    pub fn record_degradation(&self, event: &DegradationEvent) -> CiteResult<()> {
        self.with_writer(|conn| degradation_ops::insert_degradation(conn, event))
    }

    pub fn degradation_count(&self, component: &str) -> CiteResult<usize> {
        self.with_reader(|conn| degradation_ops::count_degradations(conn, component))
    }
}

impl IChunkSource for StorageEngine {
    fn get_chunks(&self, ids: &[String]) -> CiteResult<Vec<Chunk>> {
        self.with_reader(|conn| chunk_ops::get_chunks(conn, ids))
    }

    fn corpus_hash(&self) -> CiteResult<String> {
        self.with_reader(chunk_ops::corpus_hash)
    }
}

impl IManifestStore for StorageEngine {
    fn append(&self, manifest: &Manifest) -> CiteResult<()> {
        self.with_writer(|conn| manifest_ops::insert_manifest(conn, manifest))
    }

    fn get(&self, id: &str) -> CiteResult<Option<Manifest>> {
        self.with_reader(|conn| manifest_ops::get_manifest(conn, id))
    }

    fn list_ids(&self) -> CiteResult<Vec<String>> {
        self.with_reader(manifest_ops::list_manifest_ids)
    }
}

/// Run `f` inside a SAVEPOINT; roll back on error.
pub fn with_savepoint<F, T>(conn: &Connection, name: &str, f: F) -> CiteResult<T>
where
    F: FnOnce(&Connection) -> CiteResult<T>,
{
    conn.execute_batch(&format!("SAVEPOINT {name}"))
        .map_err(|e| to_storage_err(format!("{name} savepoint: {e}")))?;
    match f(conn) {
        Ok(value) => {
            conn.execute_batch(&format!("RELEASE {name}"))
                .map_err(|e| to_storage_err(format!("{name} release: {e}")))?;
            Ok(value)
        }
        Err(e) => {
            let _ = conn.execute_batch(&format!("ROLLBACK TO {name}"));
            let _ = conn.execute_batch(&format!("RELEASE {name}"));
            Err(e)
        }
    }
}
