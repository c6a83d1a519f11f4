//! Lock-free serving metrics and their text export.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

use super::types::{DRIFT_COLUMNS, DRIFT_EVENTS_TOTAL, PREDICTIONS_TOTAL};

/// The three serving metrics, shared by every request handler.
///
/// Counters only ever increase. The drift gauge is overwritten by each request,
/// so under concurrency it holds whichever request stored last.
#[derive(Debug, Default)]
pub struct ServingMetrics {
    predictions: AtomicU64,
    drift_events: AtomicU64,
    drift_columns: AtomicU64,
}

/// Point-in-time copy of [`ServingMetrics`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub prediction_total_count: u64,
    pub drift_events_total: u64,
    pub ks_drift_detected_columns: u64,
}

impl ServingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the latest drifted-column count; count an event when it is non-zero.
    pub fn record_drift(&self, drifted_columns: usize) {
        self.drift_columns.store(drifted_columns as u64, Ordering::Relaxed);
        if drifted_columns > 0 {
            self.drift_events.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Count one served prediction.
    pub fn record_prediction(&self) {
        self.predictions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn predictions(&self) -> u64 {
        self.predictions.load(Ordering::Relaxed)
    }

    pub fn drift_events(&self) -> u64 {
        self.drift_events.load(Ordering::Relaxed)
    }

    pub fn drift_columns(&self) -> u64 {
        self.drift_columns.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            prediction_total_count: self.predictions(),
            drift_events_total: self.drift_events(),
            ks_drift_detected_columns: self.drift_columns(),
        }
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> String {
        let snapshot = self.snapshot();
        let mut output = String::new();
        DRIFT_COLUMNS.render(snapshot.ks_drift_detected_columns, &mut output);
        PREDICTIONS_TOTAL.render(snapshot.prediction_total_count, &mut output);
        DRIFT_EVENTS_TOTAL.render(snapshot.drift_events_total, &mut output);
        output
    }
}
