//! Prediction handlers
//!
//! Model loading and scoring are synchronous CPU/disk work and run on the
//! blocking pool.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use vulnrisk_core::RiskPipeline;

use crate::error::{AppError, AppResult};
use crate::models::{
    BatchPredictRequest, BatchPredictResponse, PredictRequest, PredictionResponse,
};
use crate::AppState;

fn require_model_path(model_path: Option<String>) -> AppResult<String> {
    model_path
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| AppError::ValidationError("model_path is required".to_string()))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    payload
        .map(|Json(req)| req)
        .map_err(|e| AppError::ValidationError(format!("Request body is required: {}", e.body_text())))
}

/// Score a single sample (strict gate)
pub async fn predict(
    State(state): State<AppState>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> AppResult<Json<PredictionResponse>> {
    let req = body(payload)?;
    let model_path = require_model_path(req.model_path)?;
    if req.sample.text_description.is_empty() {
        return Err(AppError::ValidationError("text_description is required".to_string()));
    }

    let registry = state.registry.clone();
    let risk = state.config.risk.clone();
    let sample = req.sample;

    let report = tokio::task::spawn_blocking(move || {
        let bundle = registry.get_or_load(&model_path)?;
        RiskPipeline::new(&bundle, &risk).assess(&sample)
    })
    .await??;

    tracing::debug!(
        "Predicted {}: {} ({:.3})",
        report.sample_id,
        report.verdict.outcome.label(),
        report.verdict.outcome.risk_score()
    );

    Ok(Json(report.into()))
}

/// Score a list of samples (batch gate)
pub async fn predict_batch(
    State(state): State<AppState>,
    payload: Result<Json<BatchPredictRequest>, JsonRejection>,
) -> AppResult<Json<BatchPredictResponse>> {
    let req = body(payload)?;
    let model_path = require_model_path(req.model_path)?;
    if req.samples.is_empty() {
        return Err(AppError::ValidationError("samples must be a non-empty list".to_string()));
    }

    let registry = state.registry.clone();
    let risk = state.config.risk.clone();
    let samples = req.samples;

    let report = tokio::task::spawn_blocking(move || {
        let bundle = registry.get_or_load(&model_path)?;
        RiskPipeline::new(&bundle, &risk).assess_batch(&samples)
    })
    .await??;

    tracing::info!(
        "Batch of {} scored: {} critical, {} high, {} not applicable",
        report.summary.total,
        report.summary.critical,
        report.summary.high,
        report.summary.not_applicable
    );

    Ok(Json(BatchPredictResponse {
        predictions: report.predictions.into_iter().map(PredictionResponse::from).collect(),
        summary: report.summary,
    }))
}
