use axum::{extract::State, response::IntoResponse};
use debezium_client::{CallContext, DebeziumClient};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::ApiResponse;

pub mod connectors;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<DebeziumClient>,
    /// Deadline for each call to Connect made on behalf of a request
    pub call_timeout: Option<Duration>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(client: Arc<DebeziumClient>, call_timeout: Option<Duration>) -> Self {
        Self {
            client,
            call_timeout,
            started_at: Instant::now(),
        }
    }

    pub fn call_context(&self) -> CallContext {
        match self.call_timeout {
            Some(timeout) => CallContext::with_timeout(timeout),
            None => CallContext::background(),
        }
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_seconds: u64,
    pub connect_url: Option<String>,
}

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let response = HealthResponse {
        status: "healthy".to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        connect_url: state.client.base_url().map(str::to_string),
    };

    ApiResponse::success(response, "System is healthy")
}
