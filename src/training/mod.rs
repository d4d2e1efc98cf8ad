//! Model training
//!
//! The training pipeline and its fit metrics.

pub mod metrics;
pub mod trainer;

pub use metrics::TrainingReport;
pub use trainer::Trainer;
