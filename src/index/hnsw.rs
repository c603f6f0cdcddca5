// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! HNSW-backed passage index.
//!
//! Hierarchical Navigable Small World graph over normalized passage
//! vectors, searched with cosine distance. Built once at startup from the
//! corpus snapshot and shared read-only across concurrent queries.

use hnsw_rs::hnsw::{Hnsw, Neighbour};
use hnsw_rs::prelude::*;
use std::sync::Arc;
use tracing::debug;

use super::{Passage, ScoredPassage, VectorSearch};
use crate::errors::IndexError;

/// Immutable HNSW index over article passages.
///
/// Passages whose cosine similarity to the query falls below the
/// acceptance threshold are dropped from results, so "nothing relevant"
/// surfaces as an empty result set rather than a low-quality match.
pub struct PassageIndex {
    hnsw: Arc<Hnsw<'static, f32, DistCosine>>,
    passages: Arc<Vec<Arc<Passage>>>,
    dimension: usize,
    threshold: f32,
}

impl std::fmt::Debug for PassageIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PassageIndex")
            .field("passages", &self.passages.len())
            .field("dimension", &self.dimension)
            .field("threshold", &self.threshold)
            .finish_non_exhaustive()
    }
}

impl PassageIndex {
    /// Builds the index from `(passage, vector)` pairs.
    ///
    /// Every vector must have `dimension` finite components; vectors are
    /// normalized on insert so cosine distance behaves.
    pub fn build(
        entries: Vec<(Passage, Vec<f32>)>,
        dimension: usize,
        threshold: f32,
    ) -> Result<Self, IndexError> {
        for (position, (_, vector)) in entries.iter().enumerate() {
            if vector.len() != dimension {
                return Err(IndexError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
            if vector.iter().any(|v| !v.is_finite()) {
                return Err(IndexError::NonFiniteVector { position });
            }
        }

        // Layer count scales with corpus size, clamped to a sane range
        let nb_layer = if entries.len() > 1 {
            ((entries.len() as f32).log2().ceil() as usize).clamp(4, 16)
        } else {
            4
        };
        let max_nb_connection = 12;
        let ef_construction = 48;

        let mut hnsw: Hnsw<'static, f32, DistCosine> = Hnsw::new(
            max_nb_connection,
            entries.len().max(1),
            nb_layer,
            ef_construction,
            DistCosine,
        );

        let mut passages = Vec::with_capacity(entries.len());
        for (id, (passage, vector)) in entries.into_iter().enumerate() {
            let normalized = normalize_vector(&vector);
            hnsw.insert((&normalized, id));
            passages.push(Arc::new(passage));
        }
        hnsw.set_searching_mode(true);

        debug!(
            passages = passages.len(),
            dimension, threshold, "built passage index"
        );

        Ok(Self {
            hnsw: Arc::new(hnsw),
            passages: Arc::new(passages),
            dimension,
            threshold,
        })
    }

    /// Minimum cosine similarity a passage must clear to be returned
    pub fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl VectorSearch for PassageIndex {
    fn search(&self, query: &[f32], k: usize) -> Result<Vec<ScoredPassage>, IndexError> {
        if query.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        if query.iter().any(|v| !v.is_finite()) {
            return Err(IndexError::NonFiniteQuery);
        }
        if self.passages.is_empty() {
            return Ok(Vec::new());
        }

        let normalized = normalize_vector(query);
        let ef_search = (k * 2).max(50);
        let neighbours: Vec<Neighbour> = self.hnsw.search(&normalized, k, ef_search);

        let mut results: Vec<ScoredPassage> = neighbours
            .into_iter()
            .filter_map(|neighbour| {
                // Cosine distance -> similarity
                let score = 1.0 - neighbour.distance;
                if score < self.threshold {
                    return None;
                }
                self.passages.get(neighbour.d_id).map(|passage| ScoredPassage {
                    passage: Arc::clone(passage),
                    score,
                })
            })
            .collect();

        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);

        Ok(results)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }

    fn len(&self) -> usize {
        self.passages.len()
    }
}

/// Scales a vector to unit length; zero vectors pass through unchanged.
fn normalize_vector(vector: &[f32]) -> Vec<f32> {
    let magnitude: f32 = vector.iter().map(|&x| x * x).sum::<f32>().sqrt();
    if magnitude == 0.0 || !magnitude.is_finite() {
        return vector.to_vec();
    }
    vector.iter().map(|&x| x / magnitude).collect()
}
