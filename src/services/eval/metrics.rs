// Classification Metrics
// Computed over the successfully scored (non-error) samples only.

use crate::models::{Label, Metrics};

/// Decision threshold for the hard accuracy metric: score >= 0.5 predicts AI.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Compute classification metrics for paired labels and scores.
///
/// Degenerate batches are defined, never a crash: zero samples yield
/// accuracy/precision/recall/f1 of 0.0, and AUROC falls back to the 0.5
/// sentinel whenever fewer than two classes are present.
pub fn calculate_metrics(labels: &[Label], scores: &[f64]) -> Metrics {
    debug_assert_eq!(labels.len(), scores.len());
    let n = labels.len().min(scores.len());
    if n == 0 {
        return Metrics {
            accuracy: 0.0,
            auroc: 0.5,
            precision: 0.0,
            recall: 0.0,
            f1: 0.0,
        };
    }

    let mut tp = 0usize;
    let mut tn = 0usize;
    let mut fp = 0usize;
    let mut fn_ = 0usize;
    for (label, score) in labels.iter().zip(scores.iter()).take(n) {
        let predicted_ai = *score >= DECISION_THRESHOLD;
        match (label, predicted_ai) {
            (Label::Ai, true) => tp += 1,
            (Label::Ai, false) => fn_ += 1,
            (Label::Human, true) => fp += 1,
            (Label::Human, false) => tn += 1,
        }
    }

    let accuracy = (tp + tn) as f64 / n as f64;
    let precision = ratio(tp, tp + fp);
    let recall = ratio(tp, tp + fn_);
    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    Metrics {
        accuracy,
        auroc: auroc(&labels[..n], &scores[..n]),
        precision,
        recall,
        f1,
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Area under the ROC curve via the rank-sum statistic, with average ranks
/// for tied scores. Single-class batches return the 0.5 sentinel.
pub fn auroc(labels: &[Label], scores: &[f64]) -> f64 {
    let n_pos = labels.iter().filter(|l| **l == Label::Ai).count();
    let n_neg = labels.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        scores[a]
            .partial_cmp(&scores[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Average ranks over tie groups
    let mut ranks = vec![0.0f64; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let avg_rank = (i + j + 2) as f64 / 2.0;
        for k in i..=j {
            ranks[order[k]] = avg_rank;
        }
        i = j + 1;
    }

    let rank_sum_pos: f64 = labels
        .iter()
        .zip(ranks.iter())
        .filter(|(label, _)| **label == Label::Ai)
        .map(|(_, rank)| rank)
        .sum();

    let u = rank_sum_pos - (n_pos * (n_pos + 1)) as f64 / 2.0;
    u / (n_pos as f64 * n_neg as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[i32]) -> Vec<Label> {
        raw.iter().map(|v| Label::from_int(*v).unwrap()).collect()
    }

    #[test]
    fn test_perfect_separation() {
        let metrics = calculate_metrics(&labels(&[0, 1, 0, 1]), &[0.1, 0.9, 0.2, 0.8]);
        assert_eq!(metrics.accuracy, 1.0);
        assert_eq!(metrics.auroc, 1.0);
        assert_eq!(metrics.precision, 1.0);
        assert_eq!(metrics.recall, 1.0);
        assert_eq!(metrics.f1, 1.0);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        // 0.5 counts as a predicted-AI score, so the human 0.5 sample is wrong.
        let metrics = calculate_metrics(&labels(&[0, 1, 0]), &[0.1, 0.9, 0.5]);
        assert!((metrics.accuracy - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(metrics.precision, 0.5);
        assert_eq!(metrics.recall, 1.0);
    }

    #[test]
    fn test_inverted_scores() {
        let metrics = calculate_metrics(&labels(&[1, 0]), &[0.1, 0.9]);
        assert_eq!(metrics.accuracy, 0.0);
        assert_eq!(metrics.auroc, 0.0);
    }

    #[test]
    fn test_tied_scores_average_ranks() {
        // One positive and one negative tied at the same score: AUROC 0.5.
        let value = auroc(&labels(&[0, 1]), &[0.7, 0.7]);
        assert!((value - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_single_class_sentinel() {
        assert_eq!(auroc(&labels(&[1, 1]), &[0.9, 0.8]), 0.5);
        assert_eq!(auroc(&labels(&[0, 0]), &[0.1, 0.2]), 0.5);
    }

    #[test]
    fn test_empty_batch_is_defined() {
        let metrics = calculate_metrics(&[], &[]);
        assert_eq!(metrics.accuracy, 0.0);
        assert_eq!(metrics.auroc, 0.5);
        assert_eq!(metrics.f1, 0.0);
    }
}
