//! Binary classifiers consumed by training and serving.
//!
//! Serving only needs [`Classifier::predict`]; the rest of the trait exists so
//! the training pipeline can fit any implementation the same way.

mod classifier;
mod logistic;

pub use classifier::{Classifier, NEGATIVE_CLASS, POSITIVE_CLASS};
pub use logistic::{LogisticParams, LogisticRegression};
