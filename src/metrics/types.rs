//! Metric type definitions for the text exposition format.

/// Prometheus metric kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    /// Current value that can go up or down
    Gauge,
    /// Monotonically increasing value
    Counter,
}

impl MetricType {
    /// Name used on the `# TYPE` line.
    pub fn as_str(self) -> &'static str {
        match self {
            MetricType::Gauge => "gauge",
            MetricType::Counter => "counter",
        }
    }
}

/// A single metric definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDef {
    /// Metric name (must be valid Prometheus name)
    pub name: &'static str,
    /// Help text describing the metric
    pub help: &'static str,
    /// Metric type
    pub metric_type: MetricType,
}

impl MetricDef {
    /// Define a gauge
    pub const fn gauge(name: &'static str, help: &'static str) -> Self {
        Self { name, help, metric_type: MetricType::Gauge }
    }

    /// Define a counter
    pub const fn counter(name: &'static str, help: &'static str) -> Self {
        Self { name, help, metric_type: MetricType::Counter }
    }

    /// Render HELP, TYPE and the sample line.
    pub(crate) fn render(&self, value: u64, output: &mut String) {
        output.push_str(&format!("# HELP {} {}\n", self.name, self.help));
        output.push_str(&format!("# TYPE {} {}\n", self.name, self.metric_type.as_str()));
        output.push_str(&format!("{} {}\n", self.name, value));
    }
}

/// Gauge holding the drifted-column count of the most recent request.
pub const DRIFT_COLUMNS: MetricDef =
    MetricDef::gauge("ks_drift_detected_columns", "Columns flagged by the KS drift check on the latest request");

/// Counter of served predictions.
pub const PREDICTIONS_TOTAL: MetricDef =
    MetricDef::counter("prediction_total_count", "Total number of predictions served");

/// Counter of requests in which at least one column drifted.
pub const DRIFT_EVENTS_TOTAL: MetricDef =
    MetricDef::counter("drift_events_total", "Total number of requests with detected drift");
