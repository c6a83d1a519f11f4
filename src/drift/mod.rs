//! Drift detection against the training-time reference sample.
//!
//! Every live observation is compared column by column with the frozen
//! reference using the two-sample Kolmogorov-Smirnov test. A column drifts
//! when its p-value falls below the (optionally corrected) significance level.

mod detector;
mod reference;
mod statistical;
mod types;


pub use detector::{KsDriftDetector, DEFAULT_P_VALUE};
pub use reference::ReferenceSample;
pub use types::{ColumnDrift, Correction, DriftReport};

// Re-export statistical functions for advanced use
pub use statistical::{exact_p_value, ks_p_value, ks_statistic, ks_two_sample_p_value, two_sample_p_value};
