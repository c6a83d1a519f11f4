//! HTTP request handlers

use std::collections::HashMap;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::{Form, Json};

use crate::error::ChurnError;
use crate::server::{ApiResponse, AppState, HealthResponse, PredictResponse};

/// Content type of the Prometheus text exposition format.
pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

fn request_id() -> String {
    format!("req-{:016x}", rand::random::<u64>())
}

fn status_for(error: &ChurnError) -> StatusCode {
    if error.is_request_error() {
        StatusCode::BAD_REQUEST
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

/// Score one submitted form.
pub async fn predict(
    State(state): State<AppState>,
    Form(fields): Form<HashMap<String, String>>,
) -> (StatusCode, Json<ApiResponse<PredictResponse>>) {
    let req_id = request_id();
    match state.service.predict_form(&fields) {
        Ok(prediction) => (StatusCode::OK, Json(ApiResponse::success(prediction.into(), &req_id))),
        Err(e) => (status_for(&e), Json(ApiResponse::error(&e, &req_id))),
    }
}

/// Prometheus scrape endpoint.
pub async fn metrics(
    State(state): State<AppState>,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    let body = state.service.metrics().export();
    (StatusCode::OK, [(header::CONTENT_TYPE, METRICS_CONTENT_TYPE)], body)
}

/// Health check handler
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let health = HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.uptime_secs(),
        features: state.service.artifacts().schema().len(),
        metrics: state.service.metrics().snapshot(),
    };
    (StatusCode::OK, Json(health))
}
