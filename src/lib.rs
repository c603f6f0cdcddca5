// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! Retrieval-augmented question answering over a fixed news-article
//! corpus.
//!
//! A question is embedded, matched against a pre-built passage index,
//! grounded in the best passage, answered by a generation backend, and
//! delivered with a source link when the passage carries one.

pub mod api;
pub mod config;
pub mod embeddings;
pub mod errors;
pub mod generation;
pub mod index;
pub mod pipeline;
pub mod retrieval;

pub use config::{Messages, NodeConfig};
pub use embeddings::{OnnxEmbedder, QueryEmbedder};
pub use errors::{
    EmbeddingError, GenerationError, IndexError, PipelineError, RetrieverError,
};
pub use generation::{CohereClient, CompletionBackend};
pub use index::{load_index, Passage, PassageIndex, PassageMetadata, ScoredPassage, VectorSearch};
pub use pipeline::{attach_citation, build_context, Answer, PipelineConfig, QaPipeline};
pub use retrieval::Retriever;
