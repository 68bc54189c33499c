#![allow(dead_code)]

use serde::Deserialize;

use citespine_core::models::{Chunk, ChunkMetadata, PageSpan, RetrievalCandidate};

#[derive(Deserialize)]
struct Record {
    text: String,
    section_path: String,
    page_span: PageSpan,
    metadata: ChunkMetadata,
}

#[derive(Deserialize)]
struct Corpus {
    records: Vec<Record>,
}

pub fn corpus_chunks() -> Vec<Chunk> {
    let corpus: Corpus = test_fixtures::load_fixture("golden/corpus/regulatory_corpus.json");
    corpus
        .records
        .into_iter()
        .map(|r| Chunk {
            id: Chunk::derive_id(&r.metadata.family_id, &r.metadata.version_id, &r.section_path, &r.text),
            token_count: Chunk::estimate_tokens(&r.text),
            content_hash: Chunk::content_hash_of(&r.text),
            text: r.text,
            section_path: r.section_path,
            page_span: r.page_span,
            metadata: r.metadata,
        })
        .collect()
}

/// Candidates for `chunks` in the given order, best first.
pub fn candidates_for(chunks: &[Chunk]) -> Vec<RetrievalCandidate> {
    chunks
        .iter()
        .enumerate()
        .map(|(i, c)| RetrievalCandidate {
            chunk_id: c.id.clone(),
            score: 1.0 - i as f64 / 100.0,
            rank: i + 1,
            predicate_pass: true,
            metadata: c.metadata.clone(),
        })
        .collect()
}

/// Text covered by a character-offset highlight.
pub fn highlighted(chunk: &Chunk, start: usize, end: usize) -> String {
    chunk.text.chars().skip(start).take(end - start).collect()
}
