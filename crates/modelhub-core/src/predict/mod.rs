//! Inference requests and decoded predictions.

mod errors;
mod types;

pub use errors::PredictError;
pub use types::{BoundingBox, DetectedObject, PredictRequest, Prediction};
