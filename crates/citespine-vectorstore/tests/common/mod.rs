#![allow(dead_code)]

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::Deserialize;

use citespine_core::constants::EMBEDDING_DIMENSIONS;
use citespine_core::models::{ChunkMetadata, DocumentVersion, FilterPredicate, PageSpan, ResolvedPredicate};
use citespine_core::traits::IVectorStore;
use citespine_embeddings::HashedEmbedder;
use citespine_temporal::VersionResolver;

#[derive(Debug, Clone, Deserialize)]
pub struct CorpusRecord {
    pub text: String,
    pub section_path: String,
    pub page_span: PageSpan,
    pub metadata: ChunkMetadata,
    #[serde(default)]
    pub superseded_by: Option<String>,
}

#[derive(Deserialize)]
struct Corpus {
    records: Vec<CorpusRecord>,
}

pub struct Fixture {
    pub records: Vec<CorpusRecord>,
    pub embedder: HashedEmbedder,
    pub resolver: VersionResolver,
}

impl Fixture {
    pub fn load() -> Self {
        let corpus: Corpus = test_fixtures::load_fixture("golden/corpus/regulatory_corpus.json");
        let mut versions: Vec<DocumentVersion> = Vec::new();
        for r in &corpus.records {
            if !versions.iter().any(|v| v.version_id == r.metadata.version_id) {
                versions.push(DocumentVersion {
                    family_id: r.metadata.family_id.clone(),
                    version_id: r.metadata.version_id.clone(),
                    effective_date: r.metadata.effective_date,
                    superseded_by: r.superseded_by.clone(),
                });
            }
        }
        Self {
            resolver: VersionResolver::new(versions).unwrap(),
            records: corpus.records,
            embedder: HashedEmbedder::new(EMBEDDING_DIMENSIONS),
        }
    }

    pub fn chunk_id(&self, i: usize) -> String {
        format!("chunk-{i:02}")
    }

    pub fn embed(&self, text: &str) -> Vec<f32> {
        self.embedder.embed_sync(text)
    }

    pub async fn populate<S: IVectorStore>(&self, store: &S) {
        for (i, r) in self.records.iter().enumerate() {
            store
                .upsert(&self.chunk_id(i), &self.embed(&r.text), &r.metadata)
                .await
                .unwrap();
        }
    }

    pub fn predicate(&self, filters: FilterPredicate) -> ResolvedPredicate {
        self.resolver.restrict(filters)
    }

    pub fn ids_admitted(&self, predicate: &ResolvedPredicate) -> BTreeSet<String> {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| predicate.admits(&r.metadata))
            .map(|(i, _)| self.chunk_id(i))
            .collect()
    }
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}
