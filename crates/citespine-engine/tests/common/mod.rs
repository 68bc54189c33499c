#![allow(dead_code)]

use std::sync::Arc;

use serde::Deserialize;

use citespine_core::constants::EMBEDDING_DIMENSIONS;
use citespine_core::models::{ChunkMetadata, IngestRecord, PageSpan, ParityQuery, RawFilters};
use citespine_embeddings::HashedEmbedder;
use citespine_engine::{CiteEngine, RuntimeOptions};
use citespine_vectorstore::{LoopbackTransport, RemoteTransport};

#[derive(Deserialize)]
struct CorpusRecord {
    text: String,
    section_path: String,
    page_span: PageSpan,
    metadata: ChunkMetadata,
    #[serde(default)]
    superseded_by: Option<String>,
}

#[derive(Deserialize)]
struct Corpus {
    records: Vec<CorpusRecord>,
}

#[derive(Deserialize)]
struct QuerySet {
    queries: Vec<ParityQuery>,
}

#[derive(Deserialize)]
struct NoEvidence {
    queries: Vec<String>,
}

/// The golden corpus as the ingestion pipeline would hand it over.
pub fn corpus_records() -> Vec<IngestRecord> {
    let corpus: Corpus = test_fixtures::load_fixture("golden/corpus/regulatory_corpus.json");
    let embedder = HashedEmbedder::new(EMBEDDING_DIMENSIONS);
    corpus
        .records
        .into_iter()
        .map(|r| IngestRecord {
            chunk_id: None,
            embedding: embedder.embed_sync(&r.text),
            text: r.text,
            section_path: r.section_path,
            page_span: r.page_span,
            metadata: r.metadata,
            superseded_by: r.superseded_by,
            token_count: None,
        })
        .collect()
}

pub fn parity_queries() -> Vec<ParityQuery> {
    let set: QuerySet = test_fixtures::load_fixture("golden/parity/query_set.json");
    set.queries
}

pub fn no_evidence_queries() -> Vec<String> {
    let set: NoEvidence = test_fixtures::load_fixture("golden/grounding/no_evidence_queries.json");
    set.queries
}

pub fn raw(pairs: &[(&str, &str)]) -> RawFilters {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// An engine over the golden corpus with a shared loopback remote.
pub struct Seeded {
    pub engine: CiteEngine,
    pub transport: Arc<LoopbackTransport>,
}

pub async fn seeded(config_toml: Option<&str>) -> Seeded {
    let transport = Arc::new(LoopbackTransport::new());
    let engine = CiteEngine::new(RuntimeOptions {
        config_toml: config_toml.map(str::to_string),
        remote_transport: Some(RemoteTransport::Loopback(transport.clone())),
        ..RuntimeOptions::default()
    })
    .unwrap();
    for record in corpus_records() {
        engine.ingest(record).await.unwrap();
    }
    Seeded { engine, transport }
}

/// Version id of a stored chunk.
pub fn version_of(engine: &CiteEngine, chunk_id: &str) -> String {
    engine
        .storage()
        .get_chunk(chunk_id)
        .unwrap()
        .unwrap()
        .metadata
        .version_id
}

pub fn jurisdiction_of(engine: &CiteEngine, chunk_id: &str) -> String {
    engine
        .storage()
        .get_chunk(chunk_id)
        .unwrap()
        .unwrap()
        .metadata
        .jurisdiction
}
