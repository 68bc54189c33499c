use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use citespine_core::errors::{CiteError, ManifestError};
use citespine_core::models::{BackendIdentity, FilterPredicate, Manifest, NormalizedInputs, OperationKind};
use citespine_core::traits::IManifestStore;
use citespine_manifest::{compare, output_hash, CallRecord, DirectoryManifestStore, ManifestRecorder, ReplayObservation};
use citespine_storage::StorageEngine;
use serde_json::json;

fn inputs() -> NormalizedInputs {
    NormalizedInputs {
        query_text: "How is a lease liability measured?".into(),
        predicate: FilterPredicate::at(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()),
        version_ids: vec!["ifrs-16-2019".into()],
        top_k: 5,
        probes: 8,
        schema: None,
    }
}

fn call_record(answer: &str) -> CallRecord<String> {
    CallRecord {
        value: answer.to_string(),
        inputs: inputs(),
        backend: BackendIdentity {
            kind: "local".into(),
            instance: ":memory:".into(),
        },
        retrieved_chunk_ids: vec!["c1".into(), "c2".into()],
        cited_chunk_ids: vec!["c1".into()],
        answer_text: answer.to_string(),
        output: json!({ "answer": answer }),
    }
}

fn sqlite_recorder() -> (Arc<StorageEngine>, ManifestRecorder) {
    let storage = Arc::new(StorageEngine::open_in_memory().unwrap());
    let recorder = ManifestRecorder::new(storage.clone(), storage.clone());
    (storage, recorder)
}

#[tokio::test]
async fn successful_call_is_recorded_once() {
    let (storage, recorder) = sqlite_recorder();
    let (value, manifest) = recorder
        .record(OperationKind::Query, "hashed-384", async { Ok(call_record("Measured at present value [1].")) })
        .await
        .unwrap();

    assert_eq!(value, "Measured at present value [1].");
    assert_eq!(manifest.output_hash, output_hash(&manifest.output));
    assert_eq!(manifest.corpus_hash, recorder.corpus_hash().unwrap());
    assert_eq!(manifest.embedding_model, "hashed-384");
    assert!(uuid::Uuid::parse_str(&manifest.id).is_ok());

    let stored = storage.get(&manifest.id).unwrap().unwrap();
    assert_eq!(stored, manifest);
    assert_eq!(storage.list_ids().unwrap(), vec![manifest.id.clone()]);
}

#[tokio::test]
async fn failed_call_writes_nothing() {
    let (storage, recorder) = sqlite_recorder();
    let result: Result<(String, Manifest), CiteError> = recorder
        .record(OperationKind::Query, "hashed-384", async {
            Err(CiteError::DegradedService {
                backend: "remote".into(),
                attempts: 3,
                last_error: "timeout".into(),
            })
        })
        .await;

    assert!(matches!(result, Err(CiteError::DegradedService { .. })));
    assert!(storage.list_ids().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn cancelled_call_writes_nothing() {
    let (storage, recorder) = sqlite_recorder();
    let slow = recorder.record(OperationKind::Generate, "hashed-384", async {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(call_record("never"))
    });

    let outcome = tokio::time::timeout(Duration::from_secs(1), slow).await;
    assert!(outcome.is_err());
    assert!(storage.list_ids().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_id_fails_fast() {
    let (_storage, recorder) = sqlite_recorder();
    let err = recorder.load("00000000-0000-4000-8000-000000000000").unwrap_err();
    assert!(matches!(err, CiteError::ManifestNotFound { .. }));
}

#[tokio::test]
async fn recorded_manifest_replays_against_itself() {
    let (_storage, recorder) = sqlite_recorder();
    let (_, manifest) = recorder
        .record(OperationKind::Query, "hashed-384", async { Ok(call_record("Measured at present value [1].")) })
        .await
        .unwrap();

    let loaded = recorder.load(&manifest.id).unwrap();
    let observation = ReplayObservation {
        chunk_ids: loaded.retrieved_chunk_ids.clone(),
        answer_text: loaded.answer_text.clone(),
        output: loaded.output.clone(),
        corpus_hash: recorder.corpus_hash().unwrap(),
        embedding_model: "hashed-384".into(),
    };
    let report = compare(&loaded, &observation, 0.95);
    assert!(report.pass);
    assert!(report.output_hash_match);
    assert!(!report.corpus_changed);
}

#[tokio::test]
async fn directory_store_rejects_duplicates_and_keeps_original() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DirectoryManifestStore::open(dir.path().join("manifests")).unwrap());
    let chunks = Arc::new(StorageEngine::open_in_memory().unwrap());
    let recorder = ManifestRecorder::new(store.clone(), chunks);

    let (_, first) = recorder
        .record(OperationKind::Query, "hashed-384", async { Ok(call_record("first")) })
        .await
        .unwrap();

    let mut clash = first.clone();
    clash.answer_text = "overwritten".into();
    let err = store.append(&clash).unwrap_err();
    assert!(matches!(err, CiteError::ManifestError(ManifestError::DuplicateId { .. })));
    assert_eq!(store.get(&first.id).unwrap().unwrap().answer_text, "first");

    let path = store.dir().join(format!("{}.json", first.id));
    assert!(path.exists());
}

#[tokio::test]
async fn directory_store_lists_in_creation_order() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(DirectoryManifestStore::open(dir.path()).unwrap());
    let chunks = Arc::new(StorageEngine::open_in_memory().unwrap());
    let recorder = ManifestRecorder::new(store.clone(), chunks);

    let mut ids = Vec::new();
    for answer in ["a", "b", "c"] {
        let (_, m) = recorder
            .record(OperationKind::Query, "hashed-384", async move { Ok(call_record(answer)) })
            .await
            .unwrap();
        ids.push(m.id);
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    assert_eq!(store.list_ids().unwrap(), ids);
    assert!(store.get("../escape").unwrap().is_none());
}

#[test]
fn directory_store_flags_corrupt_files() {
    let dir = tempfile::tempdir().unwrap();
    let store = DirectoryManifestStore::open(dir.path()).unwrap();
    std::fs::write(dir.path().join("broken.json"), "{not json").unwrap();
    let err = store.get("broken").unwrap_err();
    assert!(matches!(err, CiteError::ManifestError(ManifestError::Corrupt { .. })));
}
