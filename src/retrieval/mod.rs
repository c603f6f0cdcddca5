// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! Query-to-passages retrieval.
//!
//! Embeds the query, searches the passage index, and returns candidates
//! ranked by descending similarity. Deterministic given an identical
//! query, model, and index.

use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::embeddings::QueryEmbedder;
use crate::errors::RetrieverError;
use crate::index::{ScoredPassage, VectorSearch};

/// Default candidate count. Wider than what ends up in the prompt: the
/// pipeline retrieves k candidates but injects fewer.
pub const DEFAULT_K: usize = 3;

/// Retrieves ranked passages for a query string.
///
/// Holds the shared embedder and index; an optional LRU cache avoids
/// re-embedding repeated queries (caching does not change results, the
/// embedder is deterministic).
pub struct Retriever {
    embedder: Arc<dyn QueryEmbedder>,
    index: Arc<dyn VectorSearch>,
    embedding_cache: Option<Mutex<LruCache<String, Vec<f32>>>>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn QueryEmbedder>, index: Arc<dyn VectorSearch>) -> Self {
        Self {
            embedder,
            index,
            embedding_cache: None,
        }
    }

    /// Enables the query-embedding cache. A `capacity` of zero leaves
    /// caching off.
    pub fn with_embedding_cache(mut self, capacity: usize) -> Self {
        self.embedding_cache =
            NonZeroUsize::new(capacity).map(|cap| Mutex::new(LruCache::new(cap)));
        self
    }

    /// Embeds `query` and returns up to `k` passages ordered by
    /// non-increasing similarity. Embedding and index failures are wrapped
    /// as [`RetrieverError`].
    pub async fn retrieve(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<ScoredPassage>, RetrieverError> {
        let vector = self.embed_cached(query).await?;
        let results = self.index.search(&vector, k)?;

        debug!(
            query_len = query.len(),
            k,
            hits = results.len(),
            top_score = results.first().map(|r| r.score),
            "retrieval complete"
        );
        Ok(results)
    }

    /// Number of passages in the underlying index
    pub fn index_len(&self) -> usize {
        self.index.len()
    }

    async fn embed_cached(&self, query: &str) -> Result<Vec<f32>, RetrieverError> {
        if let Some(cache) = &self.embedding_cache {
            if let Some(vector) = cache.lock().unwrap().get(query).cloned() {
                debug!("query embedding served from cache");
                return Ok(vector);
            }
        }

        let vector = self.embedder.embed_query(query).await?;

        if let Some(cache) = &self.embedding_cache {
            cache
                .lock()
                .unwrap()
                .put(query.to_string(), vector.clone());
        }
        Ok(vector)
    }
}
