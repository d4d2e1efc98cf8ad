//! Feature engineering and outcome encoding
//!
//! Converts raw season data into model-ready features and ranks.

pub mod encoding;
pub mod engineer;

pub use encoding::OutcomeRank;
pub use engineer::engineer_features;
