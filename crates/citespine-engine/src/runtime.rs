//! CiteEngine construction and shared plumbing.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use citespine_core::config::{BackendKind, CiteConfig, ManifestStoreKind};
use citespine_core::errors::{CiteError, CiteResult};
use citespine_core::traits::{IAnswerRewriter, IEvidenceScorer, IManifestStore, IQueryEmbedder};
use citespine_embeddings::{CachedEmbedder, EmbeddingProvider};
use citespine_grounding::{ArtifactFiller, EvidenceComposer, LexicalEntailmentScorer, SchemaRegistry};
use citespine_manifest::{DirectoryManifestStore, ManifestRecorder};
use citespine_observability::{DegradationTracker, MetricsCollector, TrackedDegradation};
use citespine_retrieval::{FilterNormalizer, RetrievalRouter};
use citespine_storage::StorageEngine;
use citespine_temporal::VersionRegistry;
use citespine_vectorstore::{RemoteTransport, VectorBackend};

pub(crate) type Embedder = CachedEmbedder<EmbeddingProvider>;

/// Options for building an engine.
#[derive(Default)]
pub struct RuntimeOptions {
    /// SQLite database path. `None` uses an in-memory database.
    pub db_path: Option<PathBuf>,
    /// TOML configuration. `None` uses defaults.
    pub config_toml: Option<String>,
    /// Transport for the remote backend, overriding `backend.remote.endpoint`.
    pub remote_transport: Option<RemoteTransport>,
    /// Evidence scorer. Defaults to `LexicalEntailmentScorer`.
    pub scorer: Option<Arc<dyn IEvidenceScorer>>,
    pub rewriter: Option<Arc<dyn IAnswerRewriter>>,
}

/// The retrieval-and-grounding engine. Cheap to share behind an `Arc`;
/// every entry point takes `&self`.
pub struct CiteEngine {
    pub(crate) config: CiteConfig,
    pub(crate) storage: Arc<StorageEngine>,
    pub(crate) embedder: Arc<Embedder>,
    pub(crate) versions: Arc<VersionRegistry>,
    pub(crate) local: RetrievalRouter<VectorBackend>,
    pub(crate) remote: RetrievalRouter<VectorBackend>,
    pub(crate) composer: EvidenceComposer,
    pub(crate) filler: ArtifactFiller,
    pub(crate) schemas: SchemaRegistry,
    pub(crate) recorder: ManifestRecorder,
    pub(crate) degradations: Mutex<DegradationTracker>,
    pub(crate) metrics: Mutex<MetricsCollector>,
}

impl CiteEngine {
    pub fn new(opts: RuntimeOptions) -> CiteResult<Self> {
        let config = match &opts.config_toml {
            Some(toml_str) => CiteConfig::from_toml(toml_str)?,
            None => CiteConfig::default(),
        };

        let storage = Arc::new(match &opts.db_path {
            Some(path) => StorageEngine::open(path)?,
            None => StorageEngine::open_in_memory()?,
        });

        let embedder = Arc::new(EmbeddingProvider::cached_from_config(&config.embedding)?);
        let dimensions = embedder.dimensions();

        // Version table hydrated from the corpus database.
        let versions = Arc::new(VersionRegistry::new(storage.list_versions()?)?);
        let normalizer = Arc::new(FilterNormalizer::from_config(&config)?);

        let local_backend = VectorBackend::from_config(BackendKind::Local, &config.backend, storage.clone(), dimensions)?;
        let remote_backend = match opts.remote_transport {
            Some(transport) => VectorBackend::remote(transport, &config.backend, dimensions),
            None => VectorBackend::from_config(BackendKind::Remote, &config.backend, storage.clone(), dimensions)?,
        };
        let router = |backend: VectorBackend| {
            RetrievalRouter::new(
                Arc::new(backend),
                normalizer.clone(),
                versions.clone(),
                config.router.clone(),
            )
            .with_max_top_k(config.retrieval.max_top_k)
        };
        let local = router(local_backend);
        let remote = router(remote_backend);

        let scorer: Arc<dyn IEvidenceScorer> = match opts.scorer {
            Some(scorer) => scorer,
            None => Arc::new(LexicalEntailmentScorer::new()),
        };
        let threshold = config.grounding.entailment_threshold;
        let mut composer = EvidenceComposer::new(scorer.clone(), threshold, config.grounding.max_claims);
        if let Some(rewriter) = opts.rewriter {
            composer = composer.with_rewriter(rewriter);
        }
        let filler = ArtifactFiller::new(scorer, threshold);
        let schemas = SchemaRegistry::from_config(&config.grounding)?;

        let manifest_store: Arc<dyn IManifestStore> = match config.manifest.store {
            ManifestStoreKind::Sqlite => storage.clone() as Arc<dyn IManifestStore>,
            ManifestStoreKind::Directory => Arc::new(DirectoryManifestStore::open(&config.manifest.directory)?),
        };
        let recorder = ManifestRecorder::new(manifest_store, storage.clone());

        let metrics = MetricsCollector::new(
            config.observability.latency_budget_ms,
            config.observability.latency_window,
        );

        tracing::info!(
            db = %storage.instance_id(),
            active = config.backend.active.as_str(),
            embedding_model = embedder.model_id(),
            versions = versions.len(),
            "citespine engine ready"
        );

        Ok(Self {
            config,
            storage,
            embedder,
            versions,
            local,
            remote,
            composer,
            filler,
            schemas,
            recorder,
            degradations: Mutex::new(DegradationTracker::new()),
            metrics: Mutex::new(metrics),
        })
    }

    pub fn config(&self) -> &CiteConfig {
        &self.config
    }

    pub fn storage(&self) -> &Arc<StorageEngine> {
        &self.storage
    }

    pub fn embedding_model(&self) -> &str {
        self.embedder.model_id()
    }

    /// The vector backend of `kind`.
    pub fn backend(&self, kind: BackendKind) -> &VectorBackend {
        self.router(kind).backend()
    }

    pub(crate) fn router(&self, kind: BackendKind) -> &RetrievalRouter<VectorBackend> {
        match kind {
            BackendKind::Local => &self.local,
            BackendKind::Remote => &self.remote,
        }
    }

    pub(crate) fn active_router(&self) -> &RetrievalRouter<VectorBackend> {
        self.router(self.config.backend.active)
    }

    /// Router for a backend kind as recorded in a manifest.
    pub(crate) fn router_named(&self, kind: &str) -> CiteResult<&RetrievalRouter<VectorBackend>> {
        match kind {
            k if k == BackendKind::Local.as_str() => Ok(&self.local),
            k if k == BackendKind::Remote.as_str() => Ok(&self.remote),
            other => Err(CiteError::BackendNotConfigured {
                backend: other.to_string(),
            }),
        }
    }

    /// Degradation history, oldest first.
    pub fn degradations(&self) -> Vec<TrackedDegradation> {
        lock(&self.degradations).events().to_vec()
    }

    pub fn is_degraded(&self, kind: BackendKind) -> bool {
        lock(&self.degradations).is_degraded(kind.as_str())
    }

    /// Snapshot of request counters and latency windows.
    pub fn metrics(&self) -> MetricsCollector {
        lock(&self.metrics).clone()
    }

    /// Book-keeping after a request: a degraded backend is recorded, a
    /// backend that answered again is marked recovered.
    pub(crate) fn observe_outcome<T>(&self, backend: &str, result: &CiteResult<T>) {
        match result {
            Ok(_) => {
                lock(&self.degradations).mark_recovered(backend);
            }
            Err(e @ CiteError::DegradedService { last_error, .. }) => {
                let event = DegradationTracker::event_for(backend, last_error);
                if let Err(persist) = self.storage.record_degradation(&event) {
                    tracing::warn!(error = %persist, "degradation event not persisted");
                }
                lock(&self.degradations).record(event);
                lock(&self.metrics).requests.record_failure(e.is_infra());
            }
            Err(e) => {
                lock(&self.metrics).requests.record_failure(e.is_infra());
            }
        }
    }

    pub(crate) fn record_latency(&self, operation: &str, latency_ms: u64) {
        lock(&self.metrics).latency.record(operation, latency_ms);
    }
}

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
