// Copyright (c) 2026 Newswire QA
// SPDX-License-Identifier: BUSL-1.1
//! HTTP chat surface.
//!
//! A thin request/response binding around the pipeline: each incoming
//! message becomes one `handle_question` call, the returned string goes
//! back verbatim. Session state lives entirely on the client side.

mod http_server;

pub use http_server::{router, serve};

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::pipeline::QaPipeline;

/// Shared server state: the pipeline plus the strings the transport owns.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<QaPipeline>,

    /// One-time greeting delivered at session start
    pub greeting: String,

    /// Generic notice returned when a real pipeline error surfaces
    pub failure_notice: String,
}

impl AppState {
    pub fn new(pipeline: Arc<QaPipeline>, greeting: String, failure_notice: String) -> Self {
        Self {
            pipeline,
            greeting,
            failure_notice,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GreetingResponse {
    pub greeting: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub passages: usize,
}
