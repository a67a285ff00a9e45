// Confidence Utilities
// Pure numeric helpers mapping raw feature values into a bounded confidence.
// Every function is total: empty and degenerate inputs yield a defined value
// in [0, 1] instead of failing.

/// Maximum class probability of a (possibly unnormalized) vector.
/// Unnormalized input is passed through a stable softmax first.
pub fn softmax_confidence(probabilities: &[f64]) -> f64 {
    if probabilities.is_empty() {
        return 0.0;
    }
    if is_distribution(probabilities) {
        return probabilities.iter().cloned().fold(0.0, f64::max).clamp(0.0, 1.0);
    }

    let max_val = probabilities.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = probabilities.iter().map(|v| (v - max_val).exp()).collect();
    let total: f64 = exps.iter().sum();
    if total <= 0.0 || !total.is_finite() {
        return 0.0;
    }
    exps.iter().cloned().fold(0.0, f64::max) / total
}

/// Margin between the top-1 and top-2 entries (top-2 restriction).
pub fn margin_confidence(probabilities: &[f64]) -> f64 {
    margin_confidence_top_k(probabilities, 2)
}

/// Margin between the two largest entries among the top `k`. Fewer than `k`
/// entries is insufficient evidence and yields 0.0.
pub fn margin_confidence_top_k(probabilities: &[f64], top_k: usize) -> f64 {
    if top_k < 2 || probabilities.len() < top_k {
        return 0.0;
    }

    let mut sorted: Vec<f64> = probabilities.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    let top = &sorted[..top_k];
    (top[0] - top[1]).clamp(0.0, 1.0)
}

/// One minus the normalized Shannon entropy of the vector. A single-element
/// vector has zero maximum entropy and is certain by vacuity (1.0).
pub fn entropy_confidence(probabilities: &[f64]) -> f64 {
    if probabilities.is_empty() {
        return 0.0;
    }
    if probabilities.len() == 1 {
        return 1.0;
    }

    let total: f64 = probabilities.iter().filter(|p| p.is_finite() && **p > 0.0).sum();
    if total <= 0.0 {
        return 0.0;
    }

    let entropy: f64 = probabilities
        .iter()
        .filter(|p| p.is_finite() && **p > 0.0)
        .map(|p| {
            let q = p / total;
            -q * q.ln()
        })
        .sum();

    let max_entropy = (probabilities.len() as f64).ln();
    (1.0 - entropy / max_entropy).clamp(0.0, 1.0)
}

/// Confidence from a raw value's distance to a decision threshold,
/// normalized by the maximum possible distance. `max_distance` defaults to
/// twice the threshold. With `higher_is_better`, values beyond the
/// threshold in the favorable direction earn an additive bonus, clipped to
/// 1.0. A collapsed normalization range (max possible distance of zero)
/// yields 0.0.
pub fn distance_confidence(
    value: f64,
    threshold: f64,
    max_distance: Option<f64>,
    higher_is_better: bool,
) -> f64 {
    let max_distance = max_distance.unwrap_or(threshold * 2.0);
    let max_possible = (max_distance - threshold).abs().max(threshold.abs());
    if max_possible <= 0.0 {
        return 0.0;
    }

    let mut confidence = (value - threshold).abs() / max_possible;
    if higher_is_better && value > threshold && max_distance > 0.0 {
        confidence += (value / max_distance) * 0.5;
    }
    confidence.clamp(0.0, 1.0)
}

/// Confidence from the spread of repeated measurements of one quantity,
/// mapped through an exponential decay against `expected_variance`
/// (default 0.1). With `inverse`, low variance means high confidence. A
/// single measurement has no variance and is returned as-is. An expected
/// variance of exactly zero is a special case: matching zero observed
/// variance is full agreement, anything else is none (no 0/0).
pub fn variance_confidence(values: &[f64], expected_variance: Option<f64>, inverse: bool) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    if values.len() == 1 {
        return values[0].clamp(0.0, 1.0);
    }

    let n = values.len() as f64;
    let mean: f64 = values.iter().sum::<f64>() / n;
    let variance: f64 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

    let expected = expected_variance.unwrap_or(0.1);
    if expected == 0.0 {
        let matches = variance == 0.0;
        return if matches == inverse { 1.0 } else { 0.0 };
    }

    let decay = (-variance / expected).exp();
    let confidence = if inverse { decay } else { 1.0 - decay };
    confidence.clamp(0.0, 1.0)
}

/// Baseline confidence for signals with no principled self-assessment.
/// Unknown names fall back to 0.5.
pub fn default_confidence_for_heuristic(signal_name: &str) -> f64 {
    match signal_name {
        "frequency_artifacts" => 0.3,
        "zlib_entropy" => 0.2,
        "stylometry" => 0.4,
        "dummy_text_signal" => 0.1,
        "aasist" => 0.9,
        "c2pa_provenance" => 1.0,
        _ => 0.5,
    }
}

fn is_distribution(values: &[f64]) -> bool {
    let mut total = 0.0;
    for v in values {
        if !v.is_finite() || *v < 0.0 || *v > 1.0 {
            return false;
        }
        total += v;
    }
    (total - 1.0).abs() < 1e-6
}
