use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use citespine_core::config::LocalBackendConfig;
use citespine_core::models::{ChunkMetadata, FilterPredicate};
use citespine_core::traits::IVectorStore;
use citespine_embeddings::HashedEmbedder;
use citespine_storage::StorageEngine;
use citespine_temporal::VersionResolver;
use citespine_vectorstore::LocalVectorStore;

const FRAMEWORKS: [&str; 3] = ["IFRS", "US_GAAP", "Other"];
const JURISDICTIONS: [&str; 4] = ["US", "EU", "UK", "Global"];

fn bench_local_search(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let embedder = HashedEmbedder::new(citespine_core::constants::EMBEDDING_DIMENSIONS);
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let store = LocalVectorStore::open(storage, &LocalBackendConfig::default(), embedder_dims(&embedder)).unwrap();
    let effective = chrono::NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();

    let mut versions = Vec::new();
    rt.block_on(async {
        for i in 0..2_000 {
            let family = format!("family-{}", i % 50);
            let version = format!("{family}-2020");
            let meta = ChunkMetadata {
                framework: FRAMEWORKS[i % 3].into(),
                jurisdiction: JURISDICTIONS[i % 4].into(),
                doc_type: "standard".into(),
                authority_level: "authoritative".into(),
                family_id: family.clone(),
                version_id: version.clone(),
                effective_date: effective,
            };
            let text = format!("paragraph {i} on lease accounting revenue controls disclosure item {}", i % 37);
            store
                .upsert(&format!("c{i}"), &embedder.embed_sync(&text), &meta)
                .await
                .unwrap();
            if i < 50 {
                versions.push(citespine_core::models::DocumentVersion {
                    family_id: family,
                    version_id: version,
                    effective_date: effective,
                    superseded_by: None,
                });
            }
        }
    });

    let resolver = VersionResolver::new(versions).unwrap();
    let mut filters = FilterPredicate::at(chrono::NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
    filters.jurisdiction = Some("EU".into());
    let predicate = resolver.restrict(filters);
    let query = embedder.embed_sync("lease accounting disclosure");

    for probes in [1usize, 4, 16] {
        c.bench_function(&format!("local_search_2000_probes_{probes}"), |b| {
            b.iter(|| {
                rt.block_on(store.query(black_box(&query), &predicate, 10, probes))
                    .unwrap()
            })
        });
    }
}

fn embedder_dims(e: &HashedEmbedder) -> usize {
    use citespine_core::traits::IQueryEmbedder;
    e.dimensions()
}

criterion_group!(benches, bench_local_search);
criterion_main!(benches);
