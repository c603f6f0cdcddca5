// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{bail, Context, Result};
use newswire_qa::{
    api::{self, AppState},
    CohereClient, NodeConfig, OnnxEmbedder, PipelineConfig, QaPipeline, QueryEmbedder,
    VectorSearch,
};
use std::{env, sync::Arc};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // config.env carries the deployment settings and the Cohere credential
    dotenv::from_filename("config.env").ok();
    dotenv::dotenv().ok();

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = NodeConfig::from_env();
    info!(
        snapshot = %config.snapshot_path.display(),
        dimension = config.embedding_dimension,
        k = config.retrieval_k,
        top_n = config.context_top_n,
        "starting newswire-qa node"
    );

    let embedder = OnnxEmbedder::new(
        "all-MiniLM-L6-v2",
        &config.model_path,
        &config.tokenizer_path,
        config.embedding_dimension,
    )
    .await
    .context("Failed to load embedding model")?;

    let index = newswire_qa::load_index(
        &config.snapshot_path,
        config.embedding_dimension,
        config.similarity_threshold,
    )?;

    if embedder.dimension() != index.dimension() {
        bail!(
            "Embedder dimension {} does not match index dimension {}",
            embedder.dimension(),
            index.dimension()
        );
    }

    let api_key = config
        .cohere_api_key
        .clone()
        .context("COHERE_API_KEY is not set")?;
    let backend = CohereClient::new(
        api_key,
        config.cohere_model.clone(),
        config.cohere_endpoint.clone(),
    );

    let pipeline = QaPipeline::new(
        Arc::new(embedder),
        Arc::new(index),
        Arc::new(backend),
        PipelineConfig::from(&config),
    )
    .with_embedding_cache(config.embedding_cache_size);

    let state = AppState::new(
        Arc::new(pipeline),
        config.messages.greeting.clone(),
        config.messages.failure_notice.clone(),
    );

    api::serve(&config.listen_addr, state).await
}
