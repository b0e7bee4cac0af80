//! Evaluation metrics for the binary classifier.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::error::{LearnError, Result};

/// Scores on the held-out split. Serialized as `{"accuracy": .., "roc_auc": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub accuracy: f64,
    pub roc_auc: f64,
}

fn check_lengths(a: usize, b: usize) -> Result<()> {
    if a != b {
        return Err(LearnError::ShapeError { expected: format!("{a} predictions"),
                                            actual: format!("{b} predictions") });
    }
    if a == 0 {
        return Err(LearnError::DataError("cannot score an empty sample".into()));
    }
    Ok(())
}

pub fn accuracy(y_true: &Array1<f64>, y_pred: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true.len(), y_pred.len())?;
    let correct = y_true.iter().zip(y_pred.iter()).filter(|(a, b)| (*a - *b).abs() < 1e-9).count();
    Ok(correct as f64 / y_true.len() as f64)
}

/// Area under the ROC curve via the rank statistic; tied scores share their
/// average rank.
pub fn roc_auc(y_true: &Array1<f64>, scores: &Array1<f64>) -> Result<f64> {
    check_lengths(y_true.len(), scores.len())?;
    let n_pos = y_true.iter().filter(|&&y| y == 1.0).count();
    let n_neg = y_true.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return Err(LearnError::TrainingError("roc_auc is undefined when only one class is present".into()));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    let mut ranks = vec![0.0; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let avg = (i + j) as f64 / 2.0 + 1.0;
        for k in i..=j {
            ranks[order[k]] = avg;
        }
        i = j + 1;
    }

    let pos_rank_sum: f64 = y_true.iter().zip(ranks.iter()).filter(|(y, _)| **y == 1.0).map(|(_, r)| r).sum();
    let n_pos = n_pos as f64;
    let n_neg = n_neg as f64;
    Ok((pos_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn accuracy_counts_matches() {
        let acc = accuracy(&array![1.0, 0.0, 1.0, 0.0], &array![1.0, 0.0, 0.0, 0.0]).unwrap();
        assert!((acc - 0.75).abs() < 1e-12);
    }

    #[test]
    fn perfect_and_inverted_ranking() {
        let y = array![0.0, 0.0, 1.0, 1.0];
        assert_eq!(roc_auc(&y, &array![0.1, 0.2, 0.8, 0.9]).unwrap(), 1.0);
        assert_eq!(roc_auc(&y, &array![0.9, 0.8, 0.2, 0.1]).unwrap(), 0.0);
    }

    #[test]
    fn ties_count_half() {
        let y = array![0.0, 1.0];
        assert_eq!(roc_auc(&y, &array![0.5, 0.5]).unwrap(), 0.5);
        let y = array![0.0, 0.0, 1.0, 1.0];
        assert_eq!(roc_auc(&y, &array![0.1, 0.4, 0.35, 0.8]).unwrap(), 0.75);
    }

    #[test]
    fn single_class_is_an_error() {
        assert!(roc_auc(&array![1.0, 1.0], &array![0.2, 0.9]).is_err());
    }
}
