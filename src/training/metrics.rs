//! Training-set evaluation metrics

use std::fmt;

/// Clamp bound keeping probabilities off 0 and 1 for the log
const LOG_LOSS_EPS: f64 = 1e-15;

/// How well the fitted model reproduces its own training set
#[derive(Debug, Clone)]
pub struct TrainingReport {
    pub samples: usize,
    pub classes: usize,
    pub accuracy: f64,
    pub log_loss: f64,
}

impl TrainingReport {
    /// Evaluate predictions and class probabilities against true labels
    ///
    /// `probabilities` rows are in `classes` order, the classifier's
    /// ascending label vocabulary.
    pub fn evaluate(
        labels: &[u8],
        predictions: &[u8],
        probabilities: &[Vec<f64>],
        classes: &[u8],
    ) -> Self {
        if labels.is_empty() {
            return TrainingReport {
                samples: 0,
                classes: classes.len(),
                accuracy: 0.0,
                log_loss: 0.0,
            };
        }

        let mut correct = 0;
        let mut loss_sum = 0.0;
        for (i, &label) in labels.iter().enumerate() {
            if predictions[i] == label {
                correct += 1;
            }
            let p = classes
                .iter()
                .position(|&class| class == label)
                .and_then(|pos| probabilities[i].get(pos).copied())
                .unwrap_or(0.0);
            loss_sum -= p.clamp(LOG_LOSS_EPS, 1.0 - LOG_LOSS_EPS).ln();
        }

        let n = labels.len();
        TrainingReport {
            samples: n,
            classes: classes.len(),
            accuracy: correct as f64 / n as f64,
            log_loss: loss_sum / n as f64,
        }
    }
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Acc: {:.2}% | Log loss: {:.4} ({} samples, {} classes)",
            self.accuracy * 100.0,
            self.log_loss,
            self.samples,
            self.classes
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let labels = [0, 1, 1];
        let predictions = [0, 1, 1];
        let probabilities = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 1.0]];

        let report = TrainingReport::evaluate(&labels, &predictions, &probabilities, &[0, 1]);
        assert_eq!(report.accuracy, 1.0);
        // Probability 1.0 clamps to 1 - eps, so loss stays tiny but positive
        assert!(report.log_loss < 1e-10);
    }

    #[test]
    fn test_half_right() {
        let labels = [0, 1];
        let predictions = [0, 0];
        let probabilities = vec![vec![0.9, 0.1], vec![0.9, 0.1]];

        let report = TrainingReport::evaluate(&labels, &predictions, &probabilities, &[0, 1]);
        assert_eq!(report.accuracy, 0.5);
    }

    #[test]
    fn test_uniform_probabilities_log_loss() {
        let labels = [0, 1, 2];
        let predictions = [0, 0, 0];
        let third = 1.0 / 3.0;
        let probabilities = vec![vec![third; 3]; 3];

        let report = TrainingReport::evaluate(&labels, &predictions, &probabilities, &[0, 1, 2]);
        assert!((report.log_loss - 3.0f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_empty_labels() {
        let report = TrainingReport::evaluate(&[], &[], &[], &[0, 1]);
        assert_eq!(report.samples, 0);
        assert_eq!(report.accuracy, 0.0);
        assert_eq!(report.log_loss, 0.0);
    }
}
