// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! Error taxonomy for the question-answering pipeline.
//!
//! Retrieval-stage and generation-backend failures are real errors and
//! propagate to the caller; the "no context found" and "backend returned
//! empty content" cases are not errors and are handled by the pipeline's
//! fallback messages instead.

use thiserror::Error;

/// Errors from the embedding model.
#[derive(Error, Debug)]
pub enum EmbeddingError {
    /// Input text is empty or whitespace-only
    #[error("Cannot embed empty input text")]
    EmptyInput,

    /// Tokenizer rejected the input
    #[error("Tokenization failed: {0}")]
    Tokenization(String),

    /// Model inference failed
    #[error("Embedding inference failed: {0}")]
    Inference(String),

    /// Model or tokenizer could not be loaded
    #[error("Embedding model unavailable: {0}")]
    ModelUnavailable(String),
}

/// Errors from the vector index.
///
/// An empty index or a query that matches nothing is NOT an error; those
/// return an empty result set.
#[derive(Error, Debug)]
pub enum IndexError {
    /// Query or stored vector dimension disagrees with the index dimension.
    /// Treated as a configuration fault, never retried.
    #[error("Dimension mismatch: index is {expected}D, got {actual}D")]
    DimensionMismatch { expected: usize, actual: usize },

    /// A vector supplied at build time contains NaN or Infinity
    #[error("Vector at position {position} contains NaN or Infinity values")]
    NonFiniteVector { position: usize },

    /// The query vector contains NaN or Infinity
    #[error("Query vector contains NaN or Infinity values")]
    NonFiniteQuery,
}

/// Errors from the retrieval stage, wrapping embedding and index failures.
#[derive(Error, Debug)]
pub enum RetrieverError {
    #[error("Query embedding failed: {0}")]
    Embedding(#[from] EmbeddingError),

    #[error("Index search failed: {0}")]
    Index(#[from] IndexError),
}

/// Errors from the generation backend.
///
/// Distinct from the "backend returned no content" case, which is a
/// successful call with an empty payload.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Backend unreachable (network failure, timeout, aborted call)
    #[error("Generation backend unreachable: {0}")]
    Transport(String),

    /// Backend rejected the supplied credential
    #[error("Generation backend rejected credentials: {0}")]
    Unauthorized(String),

    /// Backend returned a non-success status
    #[error("Generation backend returned status {status}: {body}")]
    Backend { status: u16, body: String },

    /// Backend response could not be decoded
    #[error("Generation backend returned an unreadable response: {0}")]
    InvalidResponse(String),
}

/// Top-level pipeline error surfaced to the host.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Retrieval failed: {0}")]
    Retrieval(#[from] RetrieverError),

    #[error("Generation failed: {0}")]
    Generation(#[from] GenerationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimension_mismatch_message() {
        let err = IndexError::DimensionMismatch {
            expected: 384,
            actual: 512,
        };
        let msg = err.to_string();
        assert!(msg.contains("384"));
        assert!(msg.contains("512"));
    }

    #[test]
    fn test_retriever_error_wraps_stages() {
        let err: RetrieverError = EmbeddingError::EmptyInput.into();
        assert!(matches!(err, RetrieverError::Embedding(_)));

        let err: RetrieverError = IndexError::NonFiniteQuery.into();
        assert!(matches!(err, RetrieverError::Index(_)));
    }

    #[test]
    fn test_pipeline_error_from_generation() {
        let err: PipelineError = GenerationError::Transport("connection refused".into()).into();
        assert!(err.to_string().contains("connection refused"));
    }
}
