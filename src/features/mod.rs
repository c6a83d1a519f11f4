//! Feature engineering shared verbatim by training and serving.
//!
//! A record flows through [`normalize`] (canonical category text), then
//! [`FeatureEngineer::derive`] (five calculated fields), and leaves as an
//! [`EngineeredRecord`] whose [`cells`](EngineeredRecord::cells) define the
//! column order the classifier is trained on.

mod engineer;
pub mod normalize;
pub mod prepare;


pub use engineer::{Cell, DerivedFields, EngineeredRecord, FeatureEngineer, NEW_CUSTOMER_TENURE};
