//! HTTP handlers for ai-service.

pub mod process;

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

use crate::startup::AppState;

pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "ai-service",
            "version": env!("CARGO_PKG_VERSION"),
            "mode": if state.agent.is_simulated() { "simulated" } else { "model" }
        })),
    )
}

pub async fn readiness_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ready" })))
}

pub async fn metrics() -> impl IntoResponse {
    service_core::observability::render_metrics()
}
