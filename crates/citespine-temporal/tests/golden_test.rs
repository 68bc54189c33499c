//! Golden version-resolution cases.

use chrono::NaiveDate;
use citespine_core::models::DocumentVersion;
use citespine_temporal::VersionResolver;
use serde::Deserialize;

#[derive(Deserialize)]
struct Case {
    family_id: String,
    as_of: NaiveDate,
    expected: Option<String>,
}

#[derive(Deserialize)]
struct Golden {
    versions: Vec<DocumentVersion>,
    cases: Vec<Case>,
}

#[test]
fn golden_version_resolution() {
    let golden: Golden = test_fixtures::load_fixture("golden/temporal/version_resolution.json");
    let resolver = VersionResolver::new(golden.versions).unwrap();
    for case in &golden.cases {
        assert_eq!(
            resolver.resolve(&case.family_id, case.as_of),
            case.expected.as_deref(),
            "family {} as of {}",
            case.family_id,
            case.as_of
        );
    }
}
