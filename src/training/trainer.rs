//! Model training pipeline
//!
//! Encodes outcome labels, extracts the feature matrix, fits the scaler
//! on training data only, fits the classifier, and assembles the trained
//! artifact. Any failure aborts before an artifact exists.

use crate::features::encoding::encode_labels;
use crate::model::{GradientBoostedClassifier, StandardScaler, TrainedModel};
use crate::training::metrics::TrainingReport;
use crate::{EngineeredRecord, HoopsError, ModelConfig, Result, FEATURE_NAMES};

pub struct Trainer {
    hyperparams: ModelConfig,
}

impl Trainer {
    pub fn new(hyperparams: ModelConfig) -> Self {
        Trainer { hyperparams }
    }

    /// Fit scaler and classifier on training records, producing the artifact
    pub fn train(&self, records: &[EngineeredRecord]) -> Result<TrainedModel> {
        if records.is_empty() {
            return Err(HoopsError::Training("Training set is empty".to_string()));
        }

        let labels: Vec<&str> = records.iter().map(|r| r.postseason.as_str()).collect();
        let y = encode_labels(&labels)?;

        let matrix = feature_matrix(records)?;
        log::info!(
            "Training on {} records with {} features, {} estimators",
            records.len(),
            FEATURE_NAMES.len(),
            self.hyperparams.n_estimators
        );

        let scaler = StandardScaler::fit(&matrix)?;
        let standardized = scaler.transform(&matrix)?;

        let classifier = GradientBoostedClassifier::fit(&standardized, &y, &self.hyperparams)?;

        let predictions = classifier.predict(&standardized)?;
        let probabilities = classifier.predict_proba(&standardized)?;
        let report =
            TrainingReport::evaluate(&y, &predictions, &probabilities, classifier.classes());
        log::info!("Training fit: {}", report);

        Ok(TrainedModel {
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            scaler,
            classifier,
            hyperparams: self.hyperparams.clone(),
        })
    }
}

/// Extract the feature matrix in the fixed column order
///
/// Every value must be finite; NaN or infinity poisons tree fitting
/// silently, so it is rejected here instead.
pub fn feature_matrix(records: &[EngineeredRecord]) -> Result<Vec<Vec<f64>>> {
    records
        .iter()
        .map(|record| {
            let features = record.features();
            if let Some(pos) = features.iter().position(|v| !v.is_finite()) {
                return Err(HoopsError::Training(format!(
                    "Non-finite value in feature {} for team {} ({})",
                    FEATURE_NAMES[pos], record.team, record.year
                )));
            }
            Ok(features.to_vec())
        })
        .collect()
}
