// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::error;

use super::{AppState, ChatRequest, ChatResponse, GreetingResponse, HealthResponse};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/v1/greeting", get(greeting_handler))
        .route("/v1/chat", post(chat_handler))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn serve(addr: &str, state: AppState) -> anyhow::Result<()> {
    let addr: SocketAddr = addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("chat API listening on {}", addr);

    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        passages: state.pipeline.passage_count(),
    })
}

async fn greeting_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(GreetingResponse {
        greeting: state.greeting.clone(),
    })
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> impl IntoResponse {
    match state.pipeline.handle_question(&request.message).await {
        Ok(reply) => (StatusCode::OK, Json(ChatResponse { reply })),
        Err(e) => {
            // Real errors are logged and surface as the generic notice;
            // the pipeline's fallback strings never reach this branch
            error!(error = %e, "question handling failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatResponse {
                    reply: state.failure_notice.clone(),
                }),
            )
        }
    }
}
