// Text Signals
// Baseline detectors over raw text: a deterministic keyword baseline, a
// zlib compression-ratio probe, and the stylometry heuristic.

use flate2::write::ZlibEncoder;
use flate2::Compression;
use serde_json::json;
use std::io::Write;
use tracing::debug;

use crate::models::{DetectionResult, Dtype, SignalInput};
use crate::services::signal::Signal;
use crate::services::text_stats::{compute_stylometry, estimate_perplexity};

const TEXT_INPUT_ERROR: &str = "Input must be a string.";
const EMPTY_INPUT_ERROR: &str = "Input string is empty.";

// ============ Dummy Signal ============

/// Deterministic keyword baseline, mainly useful for wiring and tests:
/// text containing "AI" scores high, everything else low.
#[derive(Debug, Default)]
pub struct DummyTextSignal;

impl Signal for DummyTextSignal {
    fn name(&self) -> &str {
        "dummy_text_signal"
    }

    fn dtype(&self) -> Dtype {
        Dtype::Text
    }

    fn run(&self, input: &SignalInput) -> DetectionResult {
        let SignalInput::Text(text) = input else {
            return DetectionResult::failure(TEXT_INPUT_ERROR);
        };

        let score = if text.contains("AI") { 0.9 } else { 0.1 };
        DetectionResult::scored(score, 1.0).with_metadata("length", json!(text.len()))
    }
}

// ============ Zlib Entropy Signal ============

/// Zlib compression ratio of the text. A lower ratio means the text is more
/// compressible (repetitive, low entropy). The ratio is diagnostic only:
/// without a reference distribution there is no confident mapping to a
/// probability, so the score stays at the neutral 0.5 with zero confidence.
#[derive(Debug, Default)]
pub struct ZlibEntropySignal;

impl Signal for ZlibEntropySignal {
    fn name(&self) -> &str {
        "zlib_entropy"
    }

    fn dtype(&self) -> Dtype {
        Dtype::Text
    }

    fn run(&self, input: &SignalInput) -> DetectionResult {
        let SignalInput::Text(text) = input else {
            return DetectionResult::failure(TEXT_INPUT_ERROR);
        };

        if text.is_empty() {
            return DetectionResult::failure(EMPTY_INPUT_ERROR)
                .with_metadata("zlib_ratio", json!(0.0));
        }

        let encoded = text.as_bytes();
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        let compressed = match encoder.write_all(encoded).and_then(|_| encoder.finish()) {
            Ok(bytes) => bytes,
            Err(e) => return DetectionResult::failure(format!("Compression failed: {e}")),
        };

        let ratio = compressed.len() as f64 / encoded.len() as f64;
        DetectionResult::neutral(0.0)
            .with_metadata("zlib_ratio", json!(ratio))
            .with_metadata("original_length", json!(encoded.len()))
            .with_metadata("compressed_length", json!(compressed.len()))
    }
}

// ============ Stylometry Signal ============

/// Minimum word count below which stylometry is inconclusive rather than
/// wrong: the result is the neutral 0.5 with no error.
const MIN_WORDS: usize = 25;

/// Lexical-diversity heuristic. Combines TTR, repetition rates, sentence
/// length and a unigram perplexity proxy in logit space through soft
/// sigmoid thresholds, so the output probability is continuous instead of
/// stepping at hard cutoffs.
#[derive(Debug, Default)]
pub struct StylometrySignal;

impl Signal for StylometrySignal {
    fn name(&self) -> &str {
        "stylometry"
    }

    fn dtype(&self) -> Dtype {
        Dtype::Text
    }

    fn run(&self, input: &SignalInput) -> DetectionResult {
        let SignalInput::Text(text) = input else {
            return DetectionResult::failure(TEXT_INPUT_ERROR);
        };

        if text.is_empty() {
            return DetectionResult::failure(EMPTY_INPUT_ERROR);
        }

        let metrics = compute_stylometry(text);
        if metrics.word_count < MIN_WORDS {
            debug!(words = metrics.word_count, "text too short for stylometry");
            return DetectionResult::neutral(0.2)
                .with_metadata("status", json!("too_short"))
                .with_metadata("word_count", json!(metrics.word_count));
        }

        let ppl = estimate_perplexity(text);
        let (score, explanations) = score_stylometry(&metrics, ppl);

        // Length-based confidence: longer samples give the lexical stats
        // more support, capped at 0.95.
        let text_len = text.chars().count() as f64;
        let confidence = (0.55 + (text_len / 1800.0).min(0.35)).min(0.95);

        DetectionResult::scored(score, confidence)
            .with_metadata("ttr", json!(metrics.ttr))
            .with_metadata("avg_sentence_len", json!(metrics.avg_sentence_len))
            .with_metadata("repeat_ratio", json!(metrics.repeat_ratio))
            .with_metadata("ngram_repeat_rate", json!(metrics.ngram_repeat_rate))
            .with_metadata("punctuation_ratio", json!(metrics.punctuation_ratio))
            .with_metadata("heuristic_ppl", json!(ppl))
            .with_metadata("explanations", json!(explanations))
    }
}

/// Sigmoid with smooth transition around `center`; decreasing in `x`.
/// `k` controls steepness (smaller = steeper).
#[inline]
fn sigmoid(x: f64, center: f64, k: f64) -> f64 {
    1.0 / (1.0 + ((x - center) / k).exp())
}

#[inline]
fn sigmoid_inv(x: f64, center: f64, k: f64) -> f64 {
    1.0 - sigmoid(x, center, k)
}

#[inline]
fn from_logit(logit: f64) -> f64 {
    1.0 / (1.0 + (-logit).exp())
}

fn score_stylometry(
    metrics: &crate::services::text_stats::StylometryMetrics,
    ppl: f64,
) -> (f64, Vec<String>) {
    let mut explanations: Vec<String> = Vec::new();
    let mut logit: f64 = 0.0;

    let ttr = metrics.ttr;
    let rep = metrics.repeat_ratio;
    let ngram = metrics.ngram_repeat_rate;
    let avg_len = metrics.avg_sentence_len;

    // Low lexical diversity suggests template-like generation; very high
    // diversity pulls the other way.
    let ttr_contrib = sigmoid(ttr, 0.58, 0.08) * 1.2 + sigmoid_inv(ttr, 0.78, 0.06) * (-0.9);
    logit += ttr_contrib;
    if ttr_contrib.abs() > 0.3 {
        explanations.push(format!("ttr={:.3} contrib={:.2}", ttr, ttr_contrib));
    }

    let rep_contrib = sigmoid_inv(rep, 0.18, 0.06) * 1.0;
    logit += rep_contrib;
    if rep_contrib > 0.3 {
        explanations.push(format!("repeat={:.3} contrib={:.2}", rep, rep_contrib));
    }

    let ngram_contrib = sigmoid_inv(ngram, 0.10, 0.04) * 1.1;
    logit += ngram_contrib;
    if ngram_contrib > 0.3 {
        explanations.push(format!("ngram={:.3} contrib={:.2}", ngram, ngram_contrib));
    }

    // U-shaped sentence-length penalty: very short and very long both lean AI.
    let len_contrib = sigmoid(avg_len, 35.0, 10.0) * 0.3 + sigmoid_inv(avg_len, 120.0, 25.0) * 0.4;
    logit += len_contrib;
    if len_contrib.abs() > 0.15 {
        explanations.push(format!("avg_len={:.1} contrib={:.2}", avg_len, len_contrib));
    }

    // Low perplexity (predictable text) leans AI.
    let ppl_contrib = sigmoid(ppl, 85.0, 20.0) * 1.0 + sigmoid_inv(ppl, 200.0, 30.0) * (-0.6);
    logit += ppl_contrib;
    if ppl_contrib.abs() > 0.2 {
        explanations.push(format!("ppl={:.1} contrib={:.2}", ppl, ppl_contrib));
    }

    // Strong AI anchor: low ttr + low ppl + high repetition together.
    let anchor_strength = sigmoid(ttr, 0.55, 0.05)
        * sigmoid(ppl, 90.0, 15.0)
        * (sigmoid_inv(rep, 0.15, 0.04) + sigmoid_inv(ngram, 0.10, 0.03))
        / 2.0;
    if anchor_strength > 0.3 {
        logit += anchor_strength * 1.5;
        explanations.push(format!("ai_anchor strength={:.2}", anchor_strength));
    }

    // Strong human anchor: high ttr + high ppl + low repetition.
    let human_strength = sigmoid_inv(ttr, 0.70, 0.05)
        * sigmoid_inv(ppl, 170.0, 25.0)
        * sigmoid(rep, 0.15, 0.04)
        * sigmoid_inv(avg_len, 25.0, 8.0);
    if human_strength > 0.3 {
        logit += human_strength * (-1.2);
        explanations.push(format!("human_anchor strength={:.2}", human_strength));
    }

    (from_logit(logit).clamp(0.02, 0.98), explanations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::confidence::default_confidence_for_heuristic;

    #[test]
    fn test_dummy_signal_scores_keyword() {
        let signal = DummyTextSignal;
        assert_eq!(signal.run(&SignalInput::text("written by AI")).score, 0.9);
        assert_eq!(signal.run(&SignalInput::text("a field journal")).score, 0.1);
    }

    #[test]
    fn test_dummy_signal_rejects_non_text() {
        let result = DummyTextSignal.run(&SignalInput::path("/tmp/file"));
        assert_eq!(result.error.as_deref(), Some("Input must be a string."));
        assert_eq!(result.score, 0.0);

        let pixels = crate::models::ImageData {
            width: 2,
            height: 2,
            channels: 3,
            pixels: vec![0; 12],
        };
        let result = DummyTextSignal.run(&SignalInput::Image(pixels));
        assert_eq!(result.error.as_deref(), Some("Input must be a string."));
    }

    #[test]
    fn test_zlib_ratio_reflects_redundancy() {
        let signal = ZlibEntropySignal;
        let repetitive = signal.run(&SignalInput::text("abc ".repeat(200)));
        let varied = signal.run(&SignalInput::text(
            "Seventeen gulls wheeled over the breakwater while a diesel ferry \
             coughed its way past the lighthouse toward open water.",
        ));

        let ratio = |r: &DetectionResult| r.metadata["zlib_ratio"].as_f64().unwrap();
        assert!(ratio(&repetitive) < ratio(&varied));
        assert_eq!(repetitive.score, 0.5);
        assert_eq!(repetitive.confidence, 0.0);
    }

    #[test]
    fn test_zlib_empty_input_is_degenerate() {
        let result = ZlibEntropySignal.run(&SignalInput::text(""));
        assert_eq!(result.error.as_deref(), Some("Input string is empty."));
        assert_eq!(result.metadata["zlib_ratio"], serde_json::json!(0.0));
    }

    #[test]
    fn test_stylometry_separates_repetitive_from_varied() {
        let signal = StylometrySignal;
        let template = "The product is good. The product is nice. The product is fine. "
            .repeat(12);
        let human = "Rain had been falling since dawn, though nobody at the harbor seemed to \
             mind; fishermen traded exaggerated stories, a dog chased spray off the pier, and \
             the baker across the road kept misplacing her change while arguing about football.";

        let template_score = signal.run(&SignalInput::text(template)).score;
        let human_score = signal.run(&SignalInput::text(human)).score;
        assert!(template_score > human_score);
        assert!(template_score > 0.5);
    }

    #[test]
    fn test_stylometry_too_short_is_neutral_not_error() {
        let result = StylometrySignal.run(&SignalInput::text("Just a few words here."));
        assert_eq!(result.score, 0.5);
        assert!(result.error.is_none());
        assert_eq!(result.metadata["status"], serde_json::json!("too_short"));
    }

    #[test]
    fn test_stylometry_validation_messages() {
        let signal = StylometrySignal;
        assert_eq!(
            signal.run(&SignalInput::path("/tmp/f")).error.as_deref(),
            Some("Input must be a string.")
        );
        assert_eq!(
            signal.run(&SignalInput::text("")).error.as_deref(),
            Some("Input string is empty.")
        );
    }

    #[test]
    fn test_scores_stay_in_bounds() {
        let signal = StylometrySignal;
        for text in [
            "word ".repeat(400),
            "Different every time with many unusual tokens scattered widely around. ".repeat(10),
        ] {
            let result = signal.run(&SignalInput::text(text));
            assert!((0.0..=1.0).contains(&result.score));
            assert!((0.0..=1.0).contains(&result.confidence));
        }
    }

    #[test]
    fn test_default_confidence_lookup_matches_names() {
        assert_eq!(default_confidence_for_heuristic(ZlibEntropySignal.name()), 0.2);
        assert_eq!(default_confidence_for_heuristic(StylometrySignal.name()), 0.4);
    }
}
