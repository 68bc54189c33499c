mod common;

use std::collections::HashSet;
use std::sync::Arc;

use citespine_core::constants::UNGROUNDED_FLAG;
use citespine_core::models::{ArtifactSchema, SchemaField};
use citespine_grounding::schema::memo_schema;
use citespine_grounding::{ArtifactFiller, LexicalEntailmentScorer};
use common::{candidates_for, corpus_chunks, highlighted};

fn filler() -> ArtifactFiller {
    ArtifactFiller::new(Arc::new(LexicalEntailmentScorer::new()), 0.5)
}

fn field(name: &str, cue: &str) -> SchemaField {
    SchemaField {
        name: name.into(),
        cue: cue.into(),
    }
}

#[test]
fn two_of_five_fields_grounded() {
    let chunks = corpus_chunks();
    let candidates = candidates_for(&chunks);
    let schema = ArtifactSchema {
        name: "review".into(),
        fields: vec![
            field("measurement", "lease liability present value"),
            field("volcanoes", "volcano eruption magma"),
            field("controls", "internal control over financial reporting"),
            field("sport", "football championship winner"),
            field("geography", "capital city of France"),
        ],
    };
    let artifact = filler().fill(&schema, "ignored", &candidates, &chunks);

    assert_eq!(artifact.schema, "review");
    assert_eq!(artifact.fields.len(), 5);
    assert_eq!(artifact.filled_count(), 2);
    assert_eq!(artifact.source_map.len(), 2);
    assert_eq!(artifact.flags.len(), 3);
    for name in ["measurement", "controls"] {
        assert!(!artifact.fields[name].is_empty());
        assert!(artifact.source_for(name).is_some());
        assert!(!artifact.is_flagged(name));
    }
    for name in ["volcanoes", "sport", "geography"] {
        assert_eq!(artifact.fields[name], "");
        assert!(artifact.source_for(name).is_none());
        assert!(artifact
            .flags
            .iter()
            .any(|f| f.field == name && f.reason == UNGROUNDED_FLAG));
    }
}

#[test]
fn every_filled_field_has_a_matching_source() {
    let chunks = corpus_chunks();
    let candidates = candidates_for(&chunks);
    let artifact = filler().fill(
        &memo_schema(),
        "How is the lease liability measured?",
        &candidates,
        &chunks,
    );

    assert!(artifact.filled_count() >= 1);
    for (name, value) in &artifact.fields {
        match artifact.source_for(name) {
            Some(entry) => {
                assert!(!value.is_empty());
                assert!(entry.confidence >= 0.5);
                let chunk = chunks.iter().find(|c| c.id == entry.chunk_id).unwrap();
                assert!(entry.highlight.within(chunk.text.chars().count()));
                assert_eq!(&highlighted(chunk, entry.highlight.start, entry.highlight.end), value);
            }
            None => {
                assert!(value.is_empty());
                assert!(artifact.is_flagged(name));
            }
        }
    }
}

#[test]
fn fields_do_not_share_a_span() {
    let chunks = corpus_chunks();
    let candidates = candidates_for(&chunks);
    let schema = ArtifactSchema {
        name: "twice".into(),
        fields: vec![field("first", "{question}"), field("second", "{question}")],
    };
    let artifact = filler().fill(&schema, "lease liability", &candidates, &chunks);
    assert_eq!(artifact.filled_count(), 2);
    let spans: HashSet<_> = artifact
        .source_map
        .iter()
        .map(|e| (e.chunk_id.clone(), e.highlight.start))
        .collect();
    assert_eq!(spans.len(), 2);
}

#[test]
fn unrelated_request_leaves_memo_empty() {
    let chunks = corpus_chunks();
    let candidates = candidates_for(&chunks);
    let artifact = filler().fill(&memo_schema(), "How do volcanoes erupt?", &candidates, &chunks);
    assert_eq!(artifact.filled_count(), 0);
    assert!(artifact.source_map.is_empty());
    assert_eq!(artifact.flags.len(), 5);
}
