//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    service: &'static str,
    version: &'static str,
    models_dir: String,
    models_loaded: usize,
    timestamp: i64,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "vulnrisk-ml-service",
        version: env!("CARGO_PKG_VERSION"),
        models_dir: state.registry.models_dir().display().to_string(),
        models_loaded: state.registry.len(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
