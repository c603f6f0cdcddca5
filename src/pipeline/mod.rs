// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! The retrieval-augmented answer pipeline.
//!
//! One logical operation per question: embed, search, assemble context,
//! generate, attach citation. The embedder, index, and generation backend
//! are injected once at startup and shared read-only across concurrent
//! questions; no state is shared between questions.

pub mod context;

pub use context::build_context;

use std::sync::Arc;
use tracing::{debug, info};
use url::Url;

use crate::config::NodeConfig;
use crate::embeddings::QueryEmbedder;
use crate::errors::{GenerationError, PipelineError};
use crate::generation::CompletionBackend;
use crate::index::{Passage, VectorSearch};
use crate::retrieval::Retriever;

/// Pipeline tuning and user-facing strings, pulled from [`NodeConfig`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub retrieval_k: usize,
    pub context_top_n: usize,
    pub prompt_template: String,
    pub insufficient_information: String,
    pub could_not_generate: String,
    pub citation_format: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let config = NodeConfig::default();
        Self::from(&config)
    }
}

impl From<&NodeConfig> for PipelineConfig {
    fn from(config: &NodeConfig) -> Self {
        Self {
            retrieval_k: config.retrieval_k,
            context_top_n: config.context_top_n,
            prompt_template: config.messages.prompt_template.clone(),
            insufficient_information: config.messages.insufficient_information.clone(),
            could_not_generate: config.messages.could_not_generate.clone(),
            citation_format: config.messages.citation_format.clone(),
        }
    }
}

/// Final answer for one question. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub body: String,

    /// Formatted reference line derived from the top passage's URL
    pub citation: Option<String>,
}

impl Answer {
    /// Renders the answer as the single string delivered to the user.
    pub fn render(&self) -> String {
        match &self.citation {
            Some(citation) => format!("{}{}", self.body, citation),
            None => self.body.clone(),
        }
    }
}

/// Outcome of prompt synthesis, before citation handling.
enum Synthesis {
    /// No usable context; the backend was never called
    NoContext,
    /// The backend answered with empty content
    EmptyCompletion,
    Generated(String),
}

/// Builds the formatted reference line for `top`, if it carries a usable
/// URL. Malformed URLs are skipped rather than injected into the answer.
fn citation_line(top: Option<&Passage>, format: &str) -> Option<String> {
    let url = top?.metadata.url.as_deref()?;
    Url::parse(url).ok()?;
    Some(format.replace("{url}", url))
}

/// Appends a reference line from `top`'s metadata to `answer`, or returns
/// `answer` unchanged when there is no URL to cite. Purely textual.
pub fn attach_citation(answer: String, top: Option<&Passage>, format: &str) -> String {
    match citation_line(top, format) {
        Some(line) => format!("{answer}{line}"),
        None => answer,
    }
}

/// The question-answering pipeline entry point.
pub struct QaPipeline {
    retriever: Retriever,
    backend: Arc<dyn CompletionBackend>,
    config: PipelineConfig,
}

impl QaPipeline {
    pub fn new(
        embedder: Arc<dyn QueryEmbedder>,
        index: Arc<dyn VectorSearch>,
        backend: Arc<dyn CompletionBackend>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            retriever: Retriever::new(embedder, index),
            backend,
            config,
        }
    }

    /// Enables the retriever's query-embedding cache.
    pub fn with_embedding_cache(mut self, capacity: usize) -> Self {
        self.retriever = self.retriever.with_embedding_cache(capacity);
        self
    }

    /// Answers one question, returning the final user-facing string.
    pub async fn handle_question(&self, question: &str) -> Result<String, PipelineError> {
        Ok(self.answer(question).await?.render())
    }

    /// Answers one question as a structured [`Answer`].
    ///
    /// A citation is only attached when an answer was actually generated
    /// from retrieved context; the fallback messages go out verbatim.
    pub async fn answer(&self, question: &str) -> Result<Answer, PipelineError> {
        let results = self
            .retriever
            .retrieve(question, self.config.retrieval_k)
            .await?;
        let context = build_context(&results, self.config.context_top_n);

        match self.synthesize_inner(question, context.as_deref()).await? {
            Synthesis::NoContext => {
                info!("no passage cleared the similarity threshold, short-circuiting");
                Ok(Answer {
                    body: self.config.insufficient_information.clone(),
                    citation: None,
                })
            }
            Synthesis::EmptyCompletion => {
                info!("generation backend returned empty content");
                Ok(Answer {
                    body: self.config.could_not_generate.clone(),
                    citation: None,
                })
            }
            Synthesis::Generated(body) => {
                let citation = citation_line(
                    results.first().map(|scored| scored.passage.as_ref()),
                    &self.config.citation_format,
                );
                Ok(Answer { body, citation })
            }
        }
    }

    /// Composes the prompt and calls the backend once, mapping the two
    /// legitimate degraded cases to their configured messages. Absent
    /// context never reaches the backend.
    pub async fn synthesize(
        &self,
        question: &str,
        context: Option<&str>,
    ) -> Result<String, GenerationError> {
        Ok(match self.synthesize_inner(question, context).await? {
            Synthesis::NoContext => self.config.insufficient_information.clone(),
            Synthesis::EmptyCompletion => self.config.could_not_generate.clone(),
            Synthesis::Generated(body) => body,
        })
    }

    async fn synthesize_inner(
        &self,
        question: &str,
        context: Option<&str>,
    ) -> Result<Synthesis, GenerationError> {
        let Some(context) = context else {
            return Ok(Synthesis::NoContext);
        };

        let prompt = self
            .config
            .prompt_template
            .replace("{context}", context)
            .replace("{question}", question);
        debug!(prompt_len = prompt.len(), "composed generation prompt");

        match self.backend.complete(&prompt).await? {
            Some(body) if !body.trim().is_empty() => Ok(Synthesis::Generated(body)),
            _ => Ok(Synthesis::EmptyCompletion),
        }
    }

    /// Number of passages in the shared index
    pub fn passage_count(&self) -> usize {
        self.retriever.index_len()
    }
}
