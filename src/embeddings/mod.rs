// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! Text embedding capability.
//!
//! The pipeline only depends on the [`QueryEmbedder`] trait; production
//! wires in the ONNX-backed sentence transformer, tests substitute a
//! deterministic in-memory fake.

pub mod onnx_model;

pub use onnx_model::OnnxEmbedder;

use async_trait::async_trait;

use crate::errors::EmbeddingError;

/// Maps free text to a fixed-length vector.
///
/// Deterministic for a fixed model: the same text always embeds to the
/// same vector. Implementations are shared read-only across concurrent
/// queries and must not mutate state per call.
#[async_trait]
pub trait QueryEmbedder: Send + Sync {
    /// Embeds a single query string.
    ///
    /// Fails with [`EmbeddingError::EmptyInput`] for empty or
    /// whitespace-only text.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;

    /// Embeds a batch of texts, preserving input order. Used at
    /// index-build time.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;

    /// Output vector dimension
    fn dimension(&self) -> usize;
}
