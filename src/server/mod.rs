//! HTTP front end for the prediction service.
//!
//! ```text
//! POST /predict   form fields -> JSON decision with drift verdict
//! GET  /metrics   Prometheus text exposition
//! GET  /health    liveness and counters
//! ```

mod handlers;

pub use handlers::*;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};

use crate::error::{ChurnError, Result};
use crate::features::DerivedFields;
use crate::metrics::MetricsSnapshot;
use crate::service::{Decision, Prediction, PredictionService};

/// Shared handler state. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: Arc<PredictionService>,
    started: Instant,
}

impl AppState {
    pub fn new(service: PredictionService) -> Self {
        Self { service: Arc::new(service), started: Instant::now() }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}

/// API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request was successful
    pub success: bool,
    /// Response data (if successful)
    pub data: Option<T>,
    /// Error message (if failed)
    pub error: Option<String>,
    /// Error code (if failed)
    pub code: Option<String>,
    /// Request ID for tracing
    pub request_id: String,
}

impl<T> ApiResponse<T> {
    /// Create success response
    pub fn success(data: T, request_id: &str) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
            request_id: request_id.to_string(),
        }
    }

    /// Create error response
    pub fn error(error: &ChurnError, request_id: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.to_string()),
            code: Some(error.code().to_string()),
            request_id: request_id.to_string(),
        }
    }
}

/// Body of a successful `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictResponse {
    pub decision: Decision,
    pub probability: f64,
    pub derived: DerivedFields,
    pub drift_detected: bool,
    pub drifted_columns: Vec<String>,
}

impl From<Prediction> for PredictResponse {
    fn from(prediction: Prediction) -> Self {
        Self {
            decision: prediction.decision,
            probability: prediction.probability,
            derived: prediction.derived,
            drift_detected: prediction.drift.is_drift(),
            drifted_columns: prediction
                .drift
                .drifted_features()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
    pub features: usize,
    pub metrics: MetricsSnapshot,
}

/// Build the router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(predict))
        .route("/metrics", get(metrics))
        .route("/health", get(health_check))
        .with_state(state)
}

/// Bind `address` and serve until Ctrl-C.
pub async fn serve(address: SocketAddr, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|e| ChurnError::io(format!("binding {address}"), e))?;
    tracing::info!(%address, "listening");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ChurnError::io("serving HTTP", e))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("shutting down");
}
