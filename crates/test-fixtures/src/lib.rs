//! Test fixture loader for CiteSpine golden datasets.
//!
//! Fixtures live next to this crate under `golden/`; every crate in the
//! workspace can load them by relative path.

use serde::de::DeserializeOwned;
use std::path::PathBuf;

/// Root directory of the test-fixtures crate.
fn fixtures_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let mut path = PathBuf::from(&manifest_dir);

    // From a sibling crate, walk up until `test-fixtures/golden` is in view.
    loop {
        if path.join("golden").exists() && path.ends_with("test-fixtures") {
            return path;
        }
        if path.join("test-fixtures").join("golden").exists() {
            return path.join("test-fixtures");
        }
        if !path.pop() {
            panic!(
                "Could not find test-fixtures directory from CARGO_MANIFEST_DIR={}",
                manifest_dir
            );
        }
    }
}

/// Load and deserialize a JSON fixture file.
///
/// # Panics
/// Panics if the file doesn't exist or can't be deserialized.
pub fn load_fixture<T: DeserializeOwned>(relative_path: &str) -> T {
    let path = fixtures_root().join(relative_path);
    let content = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e));
    serde_json::from_str(&content)
        .unwrap_or_else(|e| panic!("Failed to parse fixture {}: {}", path.display(), e))
}

/// Load a fixture file as raw JSON Value.
pub fn load_fixture_value(relative_path: &str) -> serde_json::Value {
    load_fixture(relative_path)
}

/// Check that a fixture file exists.
pub fn fixture_exists(relative_path: &str) -> bool {
    fixtures_root().join(relative_path).exists()
}

/// Get the absolute path to a fixture file.
pub fn fixture_path(relative_path: &str) -> PathBuf {
    fixtures_root().join(relative_path)
}

/// List all JSON files in a fixture subdirectory.
pub fn list_fixtures(subdir: &str) -> Vec<PathBuf> {
    let dir = fixtures_root().join(subdir);
    let Ok(entries) = std::fs::read_dir(&dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            path.extension().is_some_and(|ext| ext == "json").then_some(path)
        })
        .collect();
    files.sort();
    files
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_root_exists() {
        assert!(fixtures_root().join("golden").exists());
    }

    #[test]
    fn all_golden_files_exist() {
        let files = [
            "golden/corpus/regulatory_corpus.json",
            "golden/temporal/version_resolution.json",
            "golden/parity/query_set.json",
            "golden/grounding/no_evidence_queries.json",
        ];
        for f in &files {
            assert!(fixture_exists(f), "Missing fixture: {}", f);
        }
    }

    #[test]
    fn all_golden_files_parse_as_json() {
        let mut total = 0;
        for dir in ["golden/corpus", "golden/temporal", "golden/parity", "golden/grounding"] {
            for file in list_fixtures(dir) {
                let content = std::fs::read_to_string(&file).unwrap();
                let _: serde_json::Value = serde_json::from_str(&content)
                    .unwrap_or_else(|e| panic!("Failed to parse {}: {}", file.display(), e));
                total += 1;
            }
        }
        assert_eq!(total, 4);
    }

    #[test]
    fn corpus_records_carry_required_metadata() {
        let corpus = load_fixture_value("golden/corpus/regulatory_corpus.json");
        let records = corpus["records"].as_array().unwrap();
        assert!(records.len() >= 10);
        for r in records {
            for key in [
                "framework",
                "jurisdiction",
                "doc_type",
                "authority_level",
                "family_id",
                "version_id",
                "effective_date",
            ] {
                assert!(r["metadata"][key].is_string(), "record missing {key}: {r}");
            }
        }
    }
}
