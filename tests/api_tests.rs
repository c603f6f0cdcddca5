// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! Chat surface tests: routes, greeting, and the generic failure notice.

mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::{axis, build_index, passage, KeywordEmbedder, ScriptedBackend};
use std::sync::Arc;
use tower::ServiceExt;

use newswire_qa::api::{router, AppState, ChatResponse, GreetingResponse, HealthResponse};
use newswire_qa::{PipelineConfig, QaPipeline};

const GREETING: &str = "Welcome to the news archive assistant.";
const FAILURE: &str = "Something went wrong.";

fn test_state() -> AppState {
    let index = build_index(vec![(
        passage(
            Some("CFA Franc Update"),
            Some("https://example.com/cfa"),
            "The CFA franc held its peg this week.",
        ),
        axis(0),
    )]);
    let pipeline = QaPipeline::new(
        Arc::new(KeywordEmbedder::new(vec![("cfa franc", axis(0))])),
        Arc::new(index),
        Arc::new(ScriptedBackend::returning("It held its peg.")),
        PipelineConfig::default(),
    );
    AppState::new(Arc::new(pipeline), GREETING.to_string(), FAILURE.to_string())
}

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_passage_count() {
    let response = router(test_state())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let health: HealthResponse = body_json(response).await;
    assert_eq!(health.status, "ok");
    assert_eq!(health.passages, 1);
}

#[tokio::test]
async fn test_greeting_returns_configured_string() {
    let response = router(test_state())
        .oneshot(
            Request::builder()
                .uri("/v1/greeting")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let greeting: GreetingResponse = body_json(response).await;
    assert_eq!(greeting.greeting, GREETING);
}

#[tokio::test]
async fn test_chat_answers_with_citation() {
    let request = Request::builder()
        .method("POST")
        .uri("/v1/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"message": "What happened to the CFA franc?"}"#,
        ))
        .unwrap();

    let response = router(test_state()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let chat: ChatResponse = body_json(response).await;
    assert!(chat.reply.starts_with("It held its peg."));
    assert!(chat.reply.contains("https://example.com/cfa"));
}

#[tokio::test]
async fn test_pipeline_error_maps_to_failure_notice() {
    // An empty message fails embedding, which is a real error rather than
    // a fallback case
    let request = Request::builder()
        .method("POST")
        .uri("/v1/chat")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"message": "   "}"#))
        .unwrap();

    let response = router(test_state()).oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let chat: ChatResponse = body_json(response).await;
    assert_eq!(chat.reply, FAILURE);
}
