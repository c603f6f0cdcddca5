// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! Node configuration loaded from environment variables.
//!
//! Deployment supplies a `config.env` file (loaded via dotenv in `main`);
//! every value has a working default except the Cohere API key, which is a
//! credential supplied out of band. All user-facing strings live here so a
//! deployment can localize them without touching the pipeline.

use std::env;
use std::path::PathBuf;

/// User-facing strings, overridable per deployment.
#[derive(Debug, Clone)]
pub struct Messages {
    /// One-time greeting delivered at session start
    pub greeting: String,

    /// Returned when retrieval finds no passage above the similarity
    /// threshold. The generation backend is never called in that case.
    pub insufficient_information: String,

    /// Returned when the backend call succeeds but yields no content
    pub could_not_generate: String,

    /// Generic notice shown when a real pipeline error surfaces
    pub failure_notice: String,

    /// Prompt template with `{context}` and `{question}` placeholders
    pub prompt_template: String,

    /// Reference line appended to answers, with a `{url}` placeholder
    pub citation_format: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            greeting: "Hello! Ask me anything about the articles in this \
                       news archive and I will answer from the most relevant \
                       coverage, with a source link where available."
                .to_string(),
            insufficient_information:
                "I could not find enough relevant information to answer your question.".to_string(),
            could_not_generate: "I was not able to generate an answer.".to_string(),
            failure_notice: "Something went wrong while answering your question. Please try again."
                .to_string(),
            prompt_template: "Context:\n{context}\n\nQuestion: {question}\n\nAnswer:".to_string(),
            citation_format: "\n\n🔗 [Read more]({url})".to_string(),
        }
    }
}

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Path to the ONNX embedding model file
    pub model_path: PathBuf,

    /// Path to the HuggingFace tokenizer JSON
    pub tokenizer_path: PathBuf,

    /// Path to the pre-built passage snapshot (read-only at query time)
    pub snapshot_path: PathBuf,

    /// Embedding dimension; must match both the model and the snapshot
    pub embedding_dimension: usize,

    /// How many candidates retrieval pulls from the index
    pub retrieval_k: usize,

    /// How many of the ranked candidates are injected into the prompt.
    /// Deliberately smaller than `retrieval_k`: retrieve wide, inject narrow.
    pub context_top_n: usize,

    /// Minimum cosine similarity for a passage to count as a match
    pub similarity_threshold: f32,

    /// Capacity of the query-embedding LRU cache (0 disables it)
    pub embedding_cache_size: usize,

    /// Cohere credential, supplied out of band
    pub cohere_api_key: Option<String>,

    /// Cohere model identifier
    pub cohere_model: String,

    /// Cohere chat endpoint
    pub cohere_endpoint: String,

    /// HTTP listen address for the chat surface
    pub listen_addr: String,

    pub messages: Messages,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/all-MiniLM-L6-v2-onnx/model.onnx"),
            tokenizer_path: PathBuf::from("./models/all-MiniLM-L6-v2-onnx/tokenizer.json"),
            snapshot_path: PathBuf::from("./data/passages.json"),
            embedding_dimension: 384,
            retrieval_k: crate::retrieval::DEFAULT_K,
            context_top_n: 1,
            similarity_threshold: 0.25,
            embedding_cache_size: 256,
            cohere_api_key: None,
            cohere_model: "command-r-plus".to_string(),
            cohere_endpoint: "https://api.cohere.com/v1/chat".to_string(),
            listen_addr: "127.0.0.1:8080".to_string(),
            messages: Messages::default(),
        }
    }
}

impl NodeConfig {
    /// Builds a config from environment variables, falling back to defaults
    /// for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let messages = Messages {
            greeting: env_string("QA_GREETING", defaults.messages.greeting),
            insufficient_information: env_string(
                "QA_NO_CONTEXT_MESSAGE",
                defaults.messages.insufficient_information,
            ),
            could_not_generate: env_string(
                "QA_EMPTY_COMPLETION_MESSAGE",
                defaults.messages.could_not_generate,
            ),
            failure_notice: env_string("QA_FAILURE_MESSAGE", defaults.messages.failure_notice),
            prompt_template: env_string("QA_PROMPT_TEMPLATE", defaults.messages.prompt_template),
            citation_format: env_string("QA_CITATION_FORMAT", defaults.messages.citation_format),
        };

        Self {
            model_path: env_path("QA_MODEL_PATH", defaults.model_path),
            tokenizer_path: env_path("QA_TOKENIZER_PATH", defaults.tokenizer_path),
            snapshot_path: env_path("QA_SNAPSHOT_PATH", defaults.snapshot_path),
            embedding_dimension: env_parse("QA_EMBEDDING_DIMENSION", defaults.embedding_dimension),
            retrieval_k: env_parse("QA_RETRIEVAL_K", defaults.retrieval_k).max(1),
            context_top_n: env_parse("QA_CONTEXT_TOP_N", defaults.context_top_n).max(1),
            similarity_threshold: env_parse(
                "QA_SIMILARITY_THRESHOLD",
                defaults.similarity_threshold,
            ),
            embedding_cache_size: env_parse(
                "QA_EMBEDDING_CACHE_SIZE",
                defaults.embedding_cache_size,
            ),
            cohere_api_key: env::var("COHERE_API_KEY").ok().filter(|v| !v.is_empty()),
            cohere_model: env_string("COHERE_MODEL", defaults.cohere_model),
            cohere_endpoint: env_string("COHERE_ENDPOINT", defaults.cohere_endpoint),
            listen_addr: env_string("QA_LISTEN_ADDR", defaults.listen_addr),
            messages,
        }
    }
}

fn env_string(key: &str, default: String) -> String {
    env::var(key).ok().filter(|v| !v.is_empty()).unwrap_or(default)
}

fn env_path(key: &str, default: PathBuf) -> PathBuf {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or(default)
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}
