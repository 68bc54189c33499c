//! Local backend: partitioned index stored in the corpus database.

mod partitioner;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use citespine_core::config::LocalBackendConfig;
use citespine_core::constants::BACKEND_LOCAL;
use citespine_core::errors::{BackendError, CiteError, CiteResult};
use citespine_core::models::{BackendIdentity, ChunkMetadata, ResolvedPredicate, ScoredChunk};
use citespine_core::traits::IVectorStore;
use citespine_storage::queries::vector_ops::{self, VectorRow};
use citespine_storage::StorageEngine;

pub use partitioner::HyperplanePartitioner;

use crate::check_dimensions;
use crate::similarity::{cosine_similarity, top_k};

const META_BITS: &str = "partition_bits";
const META_SEED: &str = "partition_seed";
const META_DIMENSIONS: &str = "dimensions";

pub struct LocalVectorStore {
    storage: Arc<StorageEngine>,
    partitioner: Arc<HyperplanePartitioner>,
}

impl LocalVectorStore {
    /// Attach to the index in `storage`. If the stored partition layout
    /// differs from `config`, every vector is reassigned before returning.
    pub fn open(
        storage: Arc<StorageEngine>,
        config: &LocalBackendConfig,
        dimensions: usize,
    ) -> CiteResult<Self> {
        let partitioner = Arc::new(HyperplanePartitioner::new(config.partition_bits, config.seed, dimensions));
        let store = Self {
            storage,
            partitioner,
        };
        store.reconcile_layout(config)?;
        Ok(store)
    }

    fn reconcile_layout(&self, config: &LocalBackendConfig) -> CiteResult<()> {
        let bits = config.partition_bits.to_string();
        let seed = config.seed.to_string();
        let dims = self.partitioner.dimensions().to_string();
        self.storage.with_writer(|conn| {
            let stored_bits = vector_ops::get_meta(conn, META_BITS)?;
            let stored_seed = vector_ops::get_meta(conn, META_SEED)?;
            let stored_dims = vector_ops::get_meta(conn, META_DIMENSIONS)?;
            if let Some(stored) = &stored_dims {
                if *stored != dims && vector_ops::count_vectors(conn)? > 0 {
                    return Err(CiteError::ConfigError(format!(
                        "local index holds {stored}-dimension vectors, configured for {dims}"
                    )));
                }
            }
            let same_layout =
                stored_bits.as_deref() == Some(bits.as_str()) && stored_seed.as_deref() == Some(seed.as_str());
            if !same_layout {
                let rows = vector_ops::all_vectors(conn)?;
                for row in &rows {
                    vector_ops::set_partition(conn, &row.chunk_id, self.partitioner.partition_of(&row.embedding))?;
                }
                if !rows.is_empty() {
                    tracing::info!(vectors = rows.len(), bits = %bits, "local index repartitioned");
                }
                vector_ops::set_meta(conn, META_BITS, &bits)?;
                vector_ops::set_meta(conn, META_SEED, &seed)?;
            }
            vector_ops::set_meta(conn, META_DIMENSIONS, &dims)?;
            Ok(())
        })
    }

    pub fn partition_count(&self) -> u32 {
        self.partitioner.partition_count()
    }

    fn unavailable(e: CiteError) -> BackendError {
        BackendError::Unavailable {
            backend: BACKEND_LOCAL.to_string(),
            reason: e.to_string(),
        }
    }
}

/// Flags the scan as abandoned when the awaiting query future is dropped.
struct CancelOnDrop(Arc<AtomicBool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        self.0.store(true, Ordering::Relaxed);
    }
}

/// One local search, owned so it can run on the blocking pool.
struct Scan {
    storage: Arc<StorageEngine>,
    partitioner: Arc<HyperplanePartitioner>,
    embedding: Vec<f32>,
    predicate: ResolvedPredicate,
    k: usize,
    probes: usize,
}

impl Scan {
    /// Scan partitions in probe order. `cancelled` is checked before each
    /// partition, so an abandoned query stops at the next boundary.
    fn run(self, cancelled: &AtomicBool) -> Result<Vec<ScoredChunk>, BackendError> {
        let order = self
            .partitioner
            .probe_order(self.partitioner.partition_of(&self.embedding));
        let probes = self.probes.clamp(1, order.len());

        // The scanned set is always a prefix of `order` no shorter than
        // `probes`, so more probes never scan less. Past `probes` it widens
        // one partition at a time until enough admitted vectors are pooled.
        let mut eligible: Vec<VectorRow> = Vec::new();
        let mut scanned = 0;
        while scanned < order.len() && (scanned < probes || eligible.len() < self.k) {
            if cancelled.load(Ordering::Relaxed) {
                return Err(BackendError::Unavailable {
                    backend: BACKEND_LOCAL.to_string(),
                    reason: "scan cancelled".to_string(),
                });
            }
            let partition = order[scanned];
            let rows = self
                .storage
                .with_reader(|conn| vector_ops::scan_partitions(conn, &[partition], &self.predicate))
                .map_err(LocalVectorStore::unavailable)?;
            eligible.extend(rows);
            scanned += 1;
        }

        tracing::debug!(
            backend = BACKEND_LOCAL,
            scanned_partitions = scanned,
            pool = eligible.len(),
            "local scan complete"
        );

        let hits = eligible
            .into_iter()
            .map(|row| ScoredChunk {
                score: cosine_similarity(&self.embedding, &row.embedding),
                chunk_id: row.chunk_id,
                metadata: row.metadata,
            })
            .collect();
        Ok(top_k(hits, self.k))
    }
}

impl IVectorStore for LocalVectorStore {
    fn identity(&self) -> BackendIdentity {
        BackendIdentity {
            kind: BACKEND_LOCAL.to_string(),
            instance: self.storage.instance_id(),
        }
    }

    async fn upsert(
        &self,
        chunk_id: &str,
        embedding: &[f32],
        metadata: &ChunkMetadata,
    ) -> Result<(), BackendError> {
        check_dimensions(self.partitioner.dimensions(), embedding.len())?;
        let row = VectorRow {
            chunk_id: chunk_id.to_string(),
            partition: self.partitioner.partition_of(embedding),
            embedding: embedding.to_vec(),
            metadata: metadata.clone(),
        };
        self.storage
            .with_writer(|conn| vector_ops::upsert_vector(conn, &row))
            .map(|_| ())
            .map_err(Self::unavailable)
    }

    async fn query(
        &self,
        embedding: &[f32],
        predicate: &ResolvedPredicate,
        top_k: usize,
        probes: usize,
    ) -> Result<Vec<ScoredChunk>, BackendError> {
        check_dimensions(self.partitioner.dimensions(), embedding.len())?;
        if top_k == 0 || predicate.is_empty() {
            return Ok(Vec::new());
        }

        let scan = Scan {
            storage: self.storage.clone(),
            partitioner: self.partitioner.clone(),
            embedding: embedding.to_vec(),
            predicate: predicate.clone(),
            k: top_k,
            probes,
        };
        let cancelled = Arc::new(AtomicBool::new(false));
        let _cancel = CancelOnDrop(cancelled.clone());
        tokio::task::spawn_blocking(move || scan.run(&cancelled))
            .await
            .map_err(|e| BackendError::Unavailable {
                backend: BACKEND_LOCAL.to_string(),
                reason: format!("scan task failed: {e}"),
            })?
    }

    async fn len(&self) -> Result<usize, BackendError> {
        self.storage
            .with_reader(vector_ops::count_vectors)
            .map_err(Self::unavailable)
    }
}
