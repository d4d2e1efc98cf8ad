//! Model components and the trained artifact
//!
//! The scaler and classifier plus `TrainedModel`, the immutable output of
//! training that inference loads from disk.

pub mod boosting;
pub mod scaler;
pub mod tree;

pub use boosting::GradientBoostedClassifier;
pub use scaler::StandardScaler;

use crate::{HoopsError, ModelConfig, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything inference needs, serialized as one JSON artifact
///
/// Never mutated after training; a new training run replaces the file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainedModel {
    /// Feature columns in matrix order; inference must supply exactly this layout
    pub feature_names: Vec<String>,
    pub scaler: StandardScaler,
    pub classifier: GradientBoostedClassifier,
    /// Hyperparameters the classifier was fit with
    pub hyperparams: ModelConfig,
}

impl TrainedModel {
    pub fn save(&self, path: &str) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(self)?;
        std::fs::write(path, json)?;
        log::info!("Saved model to {}", path);
        Ok(())
    }

    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Err(HoopsError::NoModel);
        }
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}
