//! Categorical encoding fitted at training time and replayed at serving time.
//!
//! Codes are assigned by sorted class order (see [`CategoricalEncoder`]), so a
//! persisted registry reproduces bit-identical indices in any process.

mod encoder;
mod registry;


pub use encoder::{CategoricalEncoder, UnseenPolicy};
pub use registry::{EncodedRecord, EncoderRegistry};
