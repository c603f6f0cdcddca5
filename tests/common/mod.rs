// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! Shared fakes for pipeline tests: a deterministic keyword embedder and
//! a scripted generation backend, substituted for the ONNX model and the
//! Cohere client.
#![allow(dead_code)] // not every test binary uses every fake

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use newswire_qa::{
    CompletionBackend, EmbeddingError, GenerationError, Passage, PassageIndex, PassageMetadata,
    QueryEmbedder,
};

pub const DIM: usize = 4;

/// Unit vector along one of the four test axes.
pub fn axis(i: usize) -> Vec<f32> {
    let mut v = vec![0.0; DIM];
    v[i] = 1.0;
    v
}

/// Deterministic embedder: the first table keyword contained in the text
/// decides the vector; anything else embeds to the fallback axis, which
/// test indexes keep orthogonal to every passage.
pub struct KeywordEmbedder {
    table: Vec<(String, Vec<f32>)>,
    fallback: Vec<f32>,
}

impl KeywordEmbedder {
    pub fn new(table: Vec<(&str, Vec<f32>)>) -> Self {
        Self {
            table: table
                .into_iter()
                .map(|(k, v)| (k.to_lowercase(), v))
                .collect(),
            fallback: axis(DIM - 1),
        }
    }
}

#[async_trait]
impl QueryEmbedder for KeywordEmbedder {
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        if text.trim().is_empty() {
            return Err(EmbeddingError::EmptyInput);
        }
        let lowered = text.to_lowercase();
        Ok(self
            .table
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, vector)| vector.clone())
            .unwrap_or_else(|| self.fallback.clone()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed_query(text).await?);
        }
        Ok(out)
    }

    fn dimension(&self) -> usize {
        DIM
    }
}

/// Scripted backend that records how often it was called.
pub struct ScriptedBackend {
    response: Mutex<Option<String>>,
    pub calls: AtomicUsize,
}

impl ScriptedBackend {
    pub fn returning(text: &str) -> Self {
        Self {
            response: Mutex::new(Some(text.to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    /// Backend that succeeds but produces no content
    pub fn empty() -> Self {
        Self {
            response: Mutex::new(None),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn complete(&self, _prompt: &str) -> Result<Option<String>, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.response.lock().unwrap().clone())
    }
}

/// Backend that is always unreachable.
pub struct FailingBackend;

#[async_trait]
impl CompletionBackend for FailingBackend {
    async fn complete(&self, _prompt: &str) -> Result<Option<String>, GenerationError> {
        Err(GenerationError::Transport("connection refused".to_string()))
    }
}

pub fn passage(title: Option<&str>, url: Option<&str>, text: &str) -> Passage {
    Passage::new(
        text,
        PassageMetadata {
            title: title.map(str::to_string),
            url: url.map(str::to_string),
            ..Default::default()
        },
    )
}

/// Builds a small index with the default acceptance threshold.
pub fn build_index(entries: Vec<(Passage, Vec<f32>)>) -> PassageIndex {
    PassageIndex::build(entries, DIM, 0.25).unwrap()
}
