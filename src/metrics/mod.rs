//! Serving metrics in the Prometheus text exposition format.
//!
//! ```ignore
//! use churnguard::metrics::ServingMetrics;
//!
//! let metrics = ServingMetrics::new();
//! metrics.record_drift(2);
//! metrics.record_prediction();
//! println!("{}", metrics.export());
//! ```

mod exporter;
mod types;


pub use exporter::{MetricsSnapshot, ServingMetrics};
pub use types::{MetricDef, MetricType, DRIFT_COLUMNS, DRIFT_EVENTS_TOTAL, PREDICTIONS_TOTAL};
