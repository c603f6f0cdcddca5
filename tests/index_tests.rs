// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! Snapshot loading and index behavior against real files.

mod common;

use common::DIM;
use std::io::Write;
use tempfile::NamedTempFile;

use newswire_qa::{load_index, IndexError, VectorSearch};

fn snapshot_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_snapshot_and_search() {
    let file = snapshot_file(
        r#"[
            {
                "text": "The CFA franc held its peg this week.",
                "vector": [1.0, 0.0, 0.0, 0.0],
                "metadata": {
                    "title": "CFA Franc Update",
                    "url": "https://example.com/cfa",
                    "section": "economy"
                }
            },
            {
                "text": "Cocoa exports rose sharply.",
                "vector": [0.0, 1.0, 0.0, 0.0],
                "metadata": { "title": "Cocoa Markets" }
            }
        ]"#,
    );

    let index = load_index(file.path(), DIM, 0.25).unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.dimension(), DIM);

    let results = index.search(&[1.0, 0.0, 0.0, 0.0], 3).unwrap();
    assert_eq!(results.len(), 1);

    let top = &results[0].passage;
    assert_eq!(top.metadata.title.as_deref(), Some("CFA Franc Update"));
    assert_eq!(top.metadata.url.as_deref(), Some("https://example.com/cfa"));
    assert_eq!(top.metadata.extra["section"], "economy");
}

#[test]
fn test_load_empty_snapshot_builds_empty_index() {
    let file = snapshot_file("[]");

    let index = load_index(file.path(), DIM, 0.25).unwrap();
    assert!(index.is_empty());
    assert!(index.search(&[1.0, 0.0, 0.0, 0.0], 3).unwrap().is_empty());
}

#[test]
fn test_load_rejects_wrong_dimension() {
    let file = snapshot_file(r#"[{ "text": "short vector", "vector": [1.0, 0.0] }]"#);

    let err = load_index(file.path(), DIM, 0.25).unwrap_err();
    assert!(err.to_string().contains("Failed to build index"));
}

#[test]
fn test_load_rejects_malformed_json() {
    let file = snapshot_file("not json at all");

    let err = load_index(file.path(), DIM, 0.25).unwrap_err();
    assert!(err.to_string().contains("Failed to parse"));
}

#[test]
fn test_load_missing_file_fails() {
    let err = load_index(std::path::Path::new("/nonexistent/passages.json"), DIM, 0.25)
        .unwrap_err();
    assert!(err.to_string().contains("Failed to read"));
}

#[test]
fn test_metadata_defaults_when_absent() {
    let file = snapshot_file(r#"[{ "text": "bare passage", "vector": [0.0, 0.0, 1.0, 0.0] }]"#);

    let index = load_index(file.path(), DIM, 0.0).unwrap();
    let results = index.search(&[0.0, 0.0, 1.0, 0.0], 1).unwrap();

    assert_eq!(results.len(), 1);
    assert!(results[0].passage.metadata.title.is_none());
    assert!(results[0].passage.metadata.url.is_none());
}

#[test]
fn test_query_dimension_mismatch_is_an_error() {
    let file = snapshot_file(r#"[{ "text": "p", "vector": [1.0, 0.0, 0.0, 0.0] }]"#);

    let index = load_index(file.path(), DIM, 0.25).unwrap();
    let err = index.search(&[1.0, 0.0], 3).unwrap_err();
    assert!(matches!(
        err,
        IndexError::DimensionMismatch {
            expected: 4,
            actual: 2
        }
    ));
}
