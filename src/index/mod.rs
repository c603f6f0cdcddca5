// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! Read-only passage index over the article corpus.
//!
//! The index is provisioned externally as a snapshot built from a one-time
//! corpus scrape; at query time it is an immutable nearest-neighbor
//! structure shared across all in-flight questions.

pub mod hnsw;
pub mod loader;

pub use hnsw::PassageIndex;
pub use loader::{load_index, load_snapshot};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::errors::IndexError;

/// Metadata attached to a passage at index-build time.
///
/// `title` and `url` are the keys the pipeline itself reads; anything else
/// the corpus scrape recorded rides along opaquely in `extra`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassageMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// A unit of retrievable text plus its metadata. Immutable after load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Passage {
    pub text: String,

    #[serde(default)]
    pub metadata: PassageMetadata,
}

impl Passage {
    pub fn new(text: impl Into<String>, metadata: PassageMetadata) -> Self {
        Self {
            text: text.into(),
            metadata,
        }
    }
}

/// A retrieved passage with its cosine similarity to the query.
#[derive(Debug, Clone)]
pub struct ScoredPassage {
    pub passage: Arc<Passage>,
    pub score: f32,
}

/// Nearest-neighbor search over passage vectors.
///
/// Implementations must be safe for concurrent calls from multiple
/// in-flight queries; there is no write path at query time.
pub trait VectorSearch: Send + Sync {
    /// Returns up to `k` passages ordered by descending similarity.
    ///
    /// An empty index, or a query nothing matches above the acceptance
    /// threshold, yields an empty result rather than an error. A query
    /// whose dimension disagrees with the index fails with
    /// [`IndexError::DimensionMismatch`].
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredPassage>, IndexError>;

    /// Vector dimension baked into the index
    fn dimension(&self) -> usize;

    /// Number of passages in the index
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
