//! Model inference for postseason predictions

use crate::features::encoding::decode_rank;
use crate::model::TrainedModel;
use crate::{EngineeredRecord, HoopsError, PredictionRecord, Result, FEATURE_NAMES};

/// Applies a trained model to inference records
pub struct Predictor {
    model: TrainedModel,
}

impl Predictor {
    /// Wrap a trained model, validating its feature layout against this
    /// build's feature columns
    pub fn new(model: TrainedModel) -> Result<Self> {
        let layout_matches = model.feature_names.len() == FEATURE_NAMES.len()
            && model
                .feature_names
                .iter()
                .zip(FEATURE_NAMES.iter())
                .all(|(have, want)| have.as_str() == *want);
        if !layout_matches {
            return Err(HoopsError::Inference(format!(
                "Model artifact expects features [{}] but this build produces [{}]",
                model.feature_names.join(", "),
                FEATURE_NAMES.join(", ")
            )));
        }
        Ok(Predictor { model })
    }

    /// Load the saved artifact and build a predictor
    pub fn load(path: &str) -> Result<Self> {
        Self::new(TrainedModel::load(path)?)
    }

    /// Predicted finish for every record, in input order
    ///
    /// Standardizes with the stored scaler parameters; nothing is refit.
    pub fn predict(&self, records: &[EngineeredRecord]) -> Result<Vec<PredictionRecord>> {
        let matrix: Vec<Vec<f64>> = records
            .iter()
            .map(|record| {
                let features = record.features();
                if let Some(pos) = features.iter().position(|v| !v.is_finite()) {
                    return Err(HoopsError::Inference(format!(
                        "Non-finite value in feature {} for team {} ({})",
                        FEATURE_NAMES[pos], record.team, record.year
                    )));
                }
                Ok(features.to_vec())
            })
            .collect::<Result<_>>()?;

        let standardized = self.model.scaler.transform(&matrix)?;
        let ranks = self.model.classifier.predict(&standardized)?;

        records
            .iter()
            .zip(ranks)
            .map(|(record, rank)| {
                Ok(PredictionRecord {
                    team: record.team.clone(),
                    pred_factor: rank,
                    pred_round: decode_rank(rank)?.phrase().to_string(),
                })
            })
            .collect()
    }

    pub fn model(&self) -> &TrainedModel {
        &self.model
    }
}
