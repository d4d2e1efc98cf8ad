//! Prediction and inference
//!
//! Loads the trained artifact and generates postseason predictions.

pub mod inference;

pub use inference::Predictor;
