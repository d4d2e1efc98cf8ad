//! Gradient-boosted multiclass classifier
//!
//! Stagewise additive model over regression trees with multinomial
//! deviance loss. Raw scores start at the log class priors; every stage
//! fits one tree per class on the softmax residuals taken at the start of
//! the stage, then applies a Newton step per terminal region and shrinks
//! it by the learning rate. Prediction is the argmax of raw scores.

use crate::model::tree::RegressionTree;
use crate::{HoopsError, ModelConfig, Result};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Terminal regions where the Hessian sum vanishes get a zero step
const NEWTON_DENOM_FLOOR: f64 = 1e-150;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GradientBoostedClassifier {
    /// Distinct training labels, ascending; predictions index into this
    classes: Vec<u8>,
    /// Per-class log prior, the stage-zero raw score
    init_scores: Vec<f64>,
    /// `n_estimators` stages of one tree per class
    stages: Vec<Vec<RegressionTree>>,
    learning_rate: f64,
    n_features: usize,
}

impl GradientBoostedClassifier {
    /// Fit the ensemble
    ///
    /// All stochastic choices come from a `StdRng` seeded with
    /// `random_state`, so identical inputs and seed produce an identical
    /// ensemble.
    pub fn fit(rows: &[Vec<f64>], labels: &[u8], params: &ModelConfig) -> Result<Self> {
        if rows.is_empty() {
            return Err(HoopsError::Training(
                "Cannot train on an empty dataset".to_string(),
            ));
        }
        if rows.len() != labels.len() {
            return Err(HoopsError::Training(format!(
                "Feature matrix has {} rows but {} labels",
                rows.len(),
                labels.len()
            )));
        }
        let n_features = rows[0].len();
        if rows.iter().any(|row| row.len() != n_features) {
            return Err(HoopsError::Training(
                "Feature matrix rows have inconsistent widths".to_string(),
            ));
        }

        let classes: Vec<u8> = labels
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        if classes.len() < 2 {
            return Err(HoopsError::Training(
                "Training data contains a single outcome class".to_string(),
            ));
        }

        let n = rows.len();
        let k = classes.len();
        let mut class_of = [0usize; 256];
        for (pos, &class) in classes.iter().enumerate() {
            class_of[class as usize] = pos;
        }
        let y: Vec<usize> = labels.iter().map(|&label| class_of[label as usize]).collect();

        let mut counts = vec![0usize; k];
        for &class_pos in &y {
            counts[class_pos] += 1;
        }
        let init_scores: Vec<f64> = counts
            .iter()
            .map(|&count| (count as f64 / n as f64).ln())
            .collect();

        let mut raw: Vec<Vec<f64>> = vec![init_scores.clone(); n];
        let mut rng = StdRng::seed_from_u64(params.random_state);
        let mut stages = Vec::with_capacity(params.n_estimators);
        let factor = (k as f64 - 1.0) / k as f64;

        for _ in 0..params.n_estimators {
            // Residuals for every class this stage use the same snapshot;
            // raw-score updates only feed the next stage
            let probs: Vec<Vec<f64>> = raw.iter().map(|scores| softmax(scores)).collect();
            let mut stage_trees = Vec::with_capacity(k);

            for class_pos in 0..k {
                let residuals: Vec<f64> = (0..n)
                    .map(|i| {
                        let target = if y[i] == class_pos { 1.0 } else { 0.0 };
                        target - probs[i][class_pos]
                    })
                    .collect();

                let mut tree = RegressionTree::fit(
                    rows,
                    &residuals,
                    params.max_depth,
                    params.min_samples_leaf,
                    &mut rng,
                );

                // Newton step per terminal region:
                // (k-1)/k * sum(residual) / sum(p * (1 - p))
                let leaf_of: Vec<usize> = rows.iter().map(|row| tree.apply(row)).collect();
                let mut numer = vec![0.0; tree.node_count()];
                let mut denom = vec![0.0; tree.node_count()];
                for i in 0..n {
                    let p = probs[i][class_pos];
                    numer[leaf_of[i]] += residuals[i];
                    denom[leaf_of[i]] += p * (1.0 - p);
                }
                for node in 0..tree.node_count() {
                    let value = if denom[node].abs() < NEWTON_DENOM_FLOOR {
                        0.0
                    } else {
                        factor * numer[node] / denom[node]
                    };
                    tree.set_leaf_value(node, value);
                }

                for (i, row) in rows.iter().enumerate() {
                    raw[i][class_pos] += params.learning_rate * tree.predict_row(row);
                }
                stage_trees.push(tree);
            }

            stages.push(stage_trees);
        }

        Ok(GradientBoostedClassifier {
            classes,
            init_scores,
            stages,
            learning_rate: params.learning_rate,
            n_features,
        })
    }

    /// Predicted class label for every row, ties going to the lower class
    pub fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<u8>> {
        rows.iter()
            .map(|row| {
                self.check_width(row)?;
                let scores = self.raw_scores(row);
                let mut best = 0;
                for (pos, &score) in scores.iter().enumerate().skip(1) {
                    if score > scores[best] {
                        best = pos;
                    }
                }
                Ok(self.classes[best])
            })
            .collect()
    }

    /// Per-class probabilities for every row, in `classes()` order
    pub fn predict_proba(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>> {
        rows.iter()
            .map(|row| {
                self.check_width(row)?;
                Ok(softmax(&self.raw_scores(row)))
            })
            .collect()
    }

    fn raw_scores(&self, row: &[f64]) -> Vec<f64> {
        let mut scores = self.init_scores.clone();
        for stage in &self.stages {
            for (class_pos, tree) in stage.iter().enumerate() {
                scores[class_pos] += self.learning_rate * tree.predict_row(row);
            }
        }
        scores
    }

    fn check_width(&self, row: &[f64]) -> Result<()> {
        if row.len() != self.n_features {
            return Err(HoopsError::Inference(format!(
                "Expected {} features, got {}",
                self.n_features,
                row.len()
            )));
        }
        Ok(())
    }

    pub fn classes(&self) -> &[u8] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_stages(&self) -> usize {
        self.stages.len()
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().fold(f64::NEG_INFINITY, |a, &b| a.max(b));
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.iter().map(|e| e / sum).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(n_estimators: usize, learning_rate: f64) -> ModelConfig {
        ModelConfig {
            learning_rate,
            n_estimators,
            min_samples_leaf: 1,
            max_depth: 3,
            random_state: 42,
        }
    }

    fn two_cluster_data() -> (Vec<Vec<f64>>, Vec<u8>) {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..5 {
            rows.push(vec![i as f64]);
            labels.push(0);
            rows.push(vec![10.0 + i as f64]);
            labels.push(1);
        }
        (rows, labels)
    }

    #[test]
    fn test_separable_two_class_fit() {
        let (rows, labels) = two_cluster_data();
        let model = GradientBoostedClassifier::fit(&rows, &labels, &params(20, 0.5)).unwrap();

        assert_eq!(model.predict(&rows).unwrap(), labels);
    }

    #[test]
    fn test_three_class_clusters() {
        let mut rows = Vec::new();
        let mut labels = Vec::new();
        for i in 0..4 {
            rows.push(vec![i as f64]);
            labels.push(0);
            rows.push(vec![10.0 + i as f64]);
            labels.push(3);
            rows.push(vec![20.0 + i as f64]);
            labels.push(7);
        }

        let model = GradientBoostedClassifier::fit(&rows, &labels, &params(30, 0.3)).unwrap();
        assert_eq!(model.classes(), &[0, 3, 7]);
        assert_eq!(model.predict(&rows).unwrap(), labels);
    }

    #[test]
    fn test_probabilities_sum_to_one() {
        let (rows, labels) = two_cluster_data();
        let model = GradientBoostedClassifier::fit(&rows, &labels, &params(10, 0.1)).unwrap();

        for probs in model.predict_proba(&rows).unwrap() {
            assert_eq!(probs.len(), 2);
            let sum: f64 = probs.iter().sum();
            assert!((sum - 1.0).abs() < 1e-12);
            assert!(probs.iter().all(|&p| (0.0..=1.0).contains(&p)));
        }
    }

    #[test]
    fn test_same_seed_bit_identical_ensemble() {
        let (rows, labels) = two_cluster_data();
        let a = GradientBoostedClassifier::fit(&rows, &labels, &params(15, 0.1)).unwrap();
        let b = GradientBoostedClassifier::fit(&rows, &labels, &params(15, 0.1)).unwrap();

        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_empty_dataset_rejected() {
        let result = GradientBoostedClassifier::fit(&[], &[], &params(10, 0.1));
        assert!(matches!(result, Err(HoopsError::Training(_))));
    }

    #[test]
    fn test_single_class_rejected() {
        let rows = vec![vec![1.0], vec![2.0]];
        let result = GradientBoostedClassifier::fit(&rows, &[3, 3], &params(10, 0.1));
        assert!(matches!(result, Err(HoopsError::Training(_))));
    }

    #[test]
    fn test_row_label_count_mismatch_rejected() {
        let rows = vec![vec![1.0], vec![2.0]];
        let result = GradientBoostedClassifier::fit(&rows, &[0], &params(10, 0.1));
        assert!(matches!(result, Err(HoopsError::Training(_))));
    }

    #[test]
    fn test_prediction_width_mismatch_rejected() {
        let (rows, labels) = two_cluster_data();
        let model = GradientBoostedClassifier::fit(&rows, &labels, &params(5, 0.1)).unwrap();

        let result = model.predict(&[vec![1.0, 2.0]]);
        assert!(matches!(result, Err(HoopsError::Inference(_))));
    }

    #[test]
    fn test_zero_stages_predicts_prior() {
        let rows = vec![vec![1.0], vec![2.0], vec![3.0]];
        let labels = vec![0, 0, 1];
        let model = GradientBoostedClassifier::fit(&rows, &labels, &params(0, 0.1)).unwrap();

        // Majority class wins everywhere without any stages
        assert_eq!(model.predict(&[vec![99.0]]).unwrap(), vec![0]);
        assert_eq!(model.n_stages(), 0);
    }
}
