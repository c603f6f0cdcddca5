// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! Loads the pre-built passage snapshot into a searchable index.
//!
//! The snapshot is produced by the corpus scrape/embedding step, which runs
//! once and outside this process. Its format stays an internal detail of
//! that collaboration: a JSON array of `{ text, vector, metadata }` entries.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::info;

use super::{Passage, PassageIndex, PassageMetadata};

#[derive(Debug, Deserialize)]
struct SnapshotEntry {
    text: String,
    vector: Vec<f32>,
    #[serde(default)]
    metadata: PassageMetadata,
}

/// Reads a snapshot file into `(passage, vector)` pairs.
pub fn load_snapshot(path: &Path) -> Result<Vec<(Passage, Vec<f32>)>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read passage snapshot at {}", path.display()))?;
    let entries: Vec<SnapshotEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse passage snapshot at {}", path.display()))?;

    Ok(entries
        .into_iter()
        .map(|entry| (Passage::new(entry.text, entry.metadata), entry.vector))
        .collect())
}

/// Loads a snapshot and builds the HNSW index over it.
pub fn load_index(path: &Path, dimension: usize, threshold: f32) -> Result<PassageIndex> {
    let entries = load_snapshot(path)?;
    let count = entries.len();

    let index = PassageIndex::build(entries, dimension, threshold)
        .with_context(|| format!("Failed to build index from {}", path.display()))?;

    info!(
        passages = count,
        dimension,
        threshold,
        snapshot = %path.display(),
        "passage index ready"
    );
    Ok(index)
}
