mod common;

use citespine_core::errors::CiteError;
use citespine_engine::{CiteEngine, RuntimeOptions};
use common::{corpus_records, raw};

#[tokio::test]
async fn file_backed_corpus_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("corpus.db");
    {
        let engine = CiteEngine::new(RuntimeOptions {
            db_path: Some(db_path.clone()),
            ..RuntimeOptions::default()
        })
        .unwrap();
        for record in corpus_records() {
            engine.ingest(record).await.unwrap();
        }
    }

    let engine = CiteEngine::new(RuntimeOptions {
        db_path: Some(db_path),
        ..RuntimeOptions::default()
    })
    .unwrap();
    assert_eq!(engine.storage().list_versions().unwrap().len(), 11);
    let response = engine
        .query(
            "How does a lessee classify a lease?",
            &raw(&[("framework", "US GAAP"), ("as_of", "2019-01-01")]),
            Some(5),
            None,
        )
        .await
        .unwrap();
    assert!(!response.citations.is_empty());

    let report = engine.replay(&response.manifest_id).await.unwrap();
    assert!(report.pass);
}

#[tokio::test]
async fn directory_manifest_store_writes_one_file_per_call() {
    let dir = tempfile::tempdir().unwrap();
    let manifests = dir.path().join("manifests");
    let config = format!(
        "[manifest]\nstore = \"directory\"\ndirectory = {:?}\n",
        manifests.display().to_string()
    );
    let engine = CiteEngine::new(RuntimeOptions {
        config_toml: Some(config),
        ..RuntimeOptions::default()
    })
    .unwrap();
    for record in corpus_records() {
        engine.ingest(record).await.unwrap();
    }

    let response = engine
        .query("lease liability", &raw(&[("jurisdiction", "EU")]), None, None)
        .await
        .unwrap();
    assert!(manifests.join(format!("{}.json", response.manifest_id)).is_file());
    assert!(engine.replay(&response.manifest_id).await.unwrap().pass);
}

#[test]
fn invalid_config_is_rejected() {
    let err = CiteEngine::new(RuntimeOptions {
        config_toml: Some("[grounding]\nentailment_threshold = 1.5\n".to_string()),
        ..RuntimeOptions::default()
    })
    .err()
    .unwrap();
    assert!(matches!(err, CiteError::ConfigError(_)), "{err}");
}

#[test]
fn unknown_backend_kind_is_rejected() {
    let result = CiteEngine::new(RuntimeOptions {
        config_toml: Some("[backend]\nactive = \"faiss\"\n".to_string()),
        ..RuntimeOptions::default()
    });
    assert!(result.is_err());
}
