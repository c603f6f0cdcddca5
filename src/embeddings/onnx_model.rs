// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! ONNX sentence-transformer embedder.
//!
//! Runs all-MiniLM-L6-v2 (or any compatible sentence transformer exported
//! to ONNX) through ONNX Runtime:
//! - BERT tokenization with padding within a batch
//! - attention-mask-weighted mean pooling over token embeddings
//! - 384-dimensional output vectors
//!
//! The model is loaded once at startup; inference afterwards makes no
//! network calls.

use async_trait::async_trait;
use ndarray::{Array2, Axis};
use ort::execution_providers::CPU as CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tokenizers::Tokenizer;
use tracing::info;

use super::QueryEmbedder;
use crate::errors::EmbeddingError;

/// ONNX Runtime embedding model.
///
/// The session is behind a `Mutex` because `ort` sessions need exclusive
/// access to run; everything else is `Arc`-shared so clones are cheap and
/// the model can serve concurrent queries.
#[derive(Clone)]
pub struct OnnxEmbedder {
    session: Arc<Mutex<Session>>,
    tokenizer: Arc<Tokenizer>,
    model_name: String,
    dimension: usize,
}

impl std::fmt::Debug for OnnxEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbedder")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbedder {
    /// Loads the model and tokenizer from disk and validates the output
    /// dimension with a test inference.
    pub async fn new<P: AsRef<Path>>(
        model_name: impl Into<String>,
        model_path: P,
        tokenizer_path: P,
        dimension: usize,
    ) -> Result<Self, EmbeddingError> {
        let model_name = model_name.into();
        let model_path = model_path.as_ref();
        let tokenizer_path = tokenizer_path.as_ref();

        if !model_path.exists() {
            return Err(EmbeddingError::ModelUnavailable(format!(
                "ONNX model file not found: {}",
                model_path.display()
            )));
        }
        if !tokenizer_path.exists() {
            return Err(EmbeddingError::ModelUnavailable(format!(
                "Tokenizer file not found: {}",
                tokenizer_path.display()
            )));
        }

        fn unavailable<R>(e: ort::Error<R>) -> EmbeddingError {
            EmbeddingError::ModelUnavailable(e.to_string())
        }
        let mut session = Session::builder()
            .map_err(unavailable)?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .map_err(unavailable)?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(unavailable)?
            .with_intra_threads(4)
            .map_err(unavailable)?
            .commit_from_file(model_path)
            .map_err(unavailable)?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| EmbeddingError::ModelUnavailable(format!("Failed to load tokenizer: {e}")))?;

        // Sanity-check the output shape before accepting the model
        {
            let (outputs, _) =
                run_inference(&mut session, &tokenizer, &["validation test".to_string()])?;
            let shape = outputs.shape();
            if shape.len() != 3 || shape[2] != dimension {
                return Err(EmbeddingError::ModelUnavailable(format!(
                    "Model outputs unexpected dimensions: {shape:?} (expected [batch, seq_len, {dimension}])"
                )));
            }
        }

        info!(model = %model_name, dimension, "ONNX embedding model loaded");

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            tokenizer: Arc::new(tokenizer),
            model_name,
            dimension,
        })
    }

    /// Model identifier this embedder was loaded with
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut session = self.session.lock().unwrap();
        let (output, masks) = run_inference(&mut session, &self.tokenizer, texts)?;

        // Token-level output [batch, seq_len, hidden]; pool to sentence
        // embeddings weighted by the attention mask so padding is ignored.
        let mut embeddings = Vec::with_capacity(texts.len());

        for (batch_idx, mask) in masks.iter().enumerate() {
            let token_embeddings = output.index_axis(Axis(0), batch_idx);
            let seq_len = token_embeddings.shape()[0];
            let hidden = token_embeddings.shape()[1];

            let mut pooled = vec![0.0f32; hidden];
            let mut mask_sum = 0.0f32;
            for i in 0..seq_len.min(mask.len()) {
                let weight = mask[i] as f32;
                mask_sum += weight;
                for j in 0..hidden {
                    pooled[j] += token_embeddings[[i, j]] * weight;
                }
            }
            for value in &mut pooled {
                *value /= mask_sum.max(1e-9);
            }

            if pooled.len() != self.dimension {
                return Err(EmbeddingError::Inference(format!(
                    "Unexpected embedding dimension: {} (expected {})",
                    pooled.len(),
                    self.dimension
                )));
            }
            embeddings.push(pooled);
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl QueryEmbedder for OnnxEmbedder {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        let mut embeddings = self.embed_texts(&[text.to_string()])?;
        Ok(embeddings.remove(0))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.iter().any(|t| t.trim().is_empty()) {
            return Err(EmbeddingError::EmptyInput);
        }
        self.embed_texts(texts)
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}

/// Tokenizes `texts`, pads them to a common length, and runs one batch
/// inference. Returns the raw `[batch, seq_len, hidden]` tensor together
/// with the per-text attention masks used for pooling.
fn run_inference(
    session: &mut Session,
    tokenizer: &Tokenizer,
    texts: &[String],
) -> Result<(ndarray::Array3<f32>, Vec<Vec<u32>>), EmbeddingError> {
    let inference = |e: ort::Error| EmbeddingError::Inference(e.to_string());

    let encodings: Vec<_> = texts
        .iter()
        .map(|text| {
            tokenizer
                .encode(text.as_str(), true)
                .map_err(|e| EmbeddingError::Tokenization(e.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let max_len = encodings
        .iter()
        .map(|enc| enc.get_ids().len())
        .max()
        .unwrap_or(0);

    let masks: Vec<Vec<u32>> = encodings
        .iter()
        .map(|enc| enc.get_attention_mask().to_vec())
        .collect();

    let batch = texts.len();
    let mut input_ids = Vec::with_capacity(batch * max_len);
    let mut attention_mask = Vec::with_capacity(batch * max_len);
    let mut token_type_ids = Vec::with_capacity(batch * max_len);

    for encoding in &encodings {
        let ids = encoding.get_ids();
        let mask = encoding.get_attention_mask();

        input_ids.extend(ids.iter().map(|&id| id as i64));
        attention_mask.extend(mask.iter().map(|&m| m as i64));
        token_type_ids.extend(std::iter::repeat(0i64).take(ids.len()));

        let padding = max_len - ids.len();
        input_ids.extend(std::iter::repeat(0i64).take(padding));
        attention_mask.extend(std::iter::repeat(0i64).take(padding));
        token_type_ids.extend(std::iter::repeat(0i64).take(padding));
    }

    let to_array = |data: Vec<i64>| {
        Array2::from_shape_vec((batch, max_len), data)
            .map_err(|e| EmbeddingError::Inference(e.to_string()))
    };
    let input_ids_array = to_array(input_ids)?;
    let attention_mask_array = to_array(attention_mask)?;
    let token_type_ids_array = to_array(token_type_ids)?;

    let outputs = session
        .run(
            ort::inputs![
                "input_ids" => Value::from_array(input_ids_array).map_err(inference)?,
                "attention_mask" => Value::from_array(attention_mask_array).map_err(inference)?,
                "token_type_ids" => Value::from_array(token_type_ids_array).map_err(inference)?
            ],
        )
        .map_err(inference)?;

    // Index 0 rather than by name: output naming varies across exports
    let output = outputs[0]
        .try_extract_array::<f32>()
        .map_err(inference)?
        .into_owned();

    let output = output
        .into_dimensionality::<ndarray::Ix3>()
        .map_err(|e| EmbeddingError::Inference(e.to_string()))?;

    Ok((output, masks))
}
