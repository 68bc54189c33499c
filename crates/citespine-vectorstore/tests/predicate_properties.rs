//! No backend ever returns a chunk its predicate rejects.

mod common;

use std::sync::{Arc, LazyLock};

use proptest::prelude::*;

use citespine_core::config::LocalBackendConfig;
use citespine_core::models::{FilterDimension, FilterPredicate};
use citespine_core::traits::IVectorStore;
use citespine_storage::StorageEngine;
use citespine_vectorstore::{LocalVectorStore, LoopbackTransport, RemoteVectorStore};
use common::Fixture;

struct Loaded {
    fx: Fixture,
    local: LocalVectorStore,
    remote: RemoteVectorStore<Arc<LoopbackTransport>>,
    rt: tokio::runtime::Runtime,
}

static LOADED: LazyLock<Loaded> = LazyLock::new(|| {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap();
    let fx = Fixture::load();
    let dims = citespine_core::constants::EMBEDDING_DIMENSIONS;
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let local = LocalVectorStore::open(storage, &LocalBackendConfig::default(), dims).unwrap();
    let remote = RemoteVectorStore::new(Arc::new(LoopbackTransport::new()), "citespine", "prop", dims);
    rt.block_on(async {
        fx.populate(&local).await;
        fx.populate(&remote).await;
    });
    Loaded { fx, local, remote, rt }
});

fn dimension_value(d: FilterDimension) -> impl Strategy<Value = Option<String>> {
    let values: Vec<&'static str> = match d {
        FilterDimension::Framework => vec!["IFRS", "US_GAAP", "Other"],
        FilterDimension::Jurisdiction => vec!["US", "EU", "UK", "Global"],
        FilterDimension::DocType => vec!["standard", "guidelines", "memo", "release", "staff_alert"],
        FilterDimension::AuthorityLevel => vec!["authoritative", "interpretive", "internal_policy"],
    };
    proptest::option::of(proptest::sample::select(values).prop_map(String::from))
}

fn filters() -> impl Strategy<Value = FilterPredicate> {
    (
        dimension_value(FilterDimension::Framework),
        dimension_value(FilterDimension::Jurisdiction),
        dimension_value(FilterDimension::DocType),
        dimension_value(FilterDimension::AuthorityLevel),
        2005i32..2027,
        1u32..=12,
    )
        .prop_map(|(framework, jurisdiction, doc_type, authority_level, y, m)| FilterPredicate {
            framework,
            jurisdiction,
            doc_type,
            authority_level,
            as_of: chrono::NaiveDate::from_ymd_opt(y, m, 1).unwrap(),
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_no_predicate_leak(filters in filters(), probes in 1usize..16, k in 1usize..15, q in 0usize..12) {
        let l = &*LOADED;
        let predicate = l.fx.predicate(filters);
        let query = l.fx.embed(&l.fx.records[q].text);
        let expected = l.fx.ids_admitted(&predicate);

        let (local, remote) = l.rt.block_on(async {
            (
                l.local.query(&query, &predicate, k, probes).await.unwrap(),
                l.remote.query(&query, &predicate, k, probes).await.unwrap(),
            )
        });
        for hit in local.iter().chain(&remote) {
            prop_assert!(predicate.admits(&hit.metadata));
            prop_assert!(expected.contains(&hit.chunk_id));
        }
        prop_assert_eq!(local.len(), k.min(expected.len()));
        prop_assert_eq!(remote.len(), k.min(expected.len()));
    }
}
