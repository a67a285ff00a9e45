// Verisig Data Models
// Shared result envelope and input types for all detection signals

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

// ============ Detection Result ============

/// Standardized output envelope for every detection signal.
///
/// `score` is the normalized AI probability (0 = human, 1 = AI); mid-range
/// values mean an uncalibrated raw metric was computed but no confident
/// mapping to a probability exists. `confidence` is the signal's own
/// reliability estimate, independent of the score. A non-null `error` means
/// the result carries no actionable score; callers must check it first.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DetectionResult {
    pub score: f64,
    pub confidence: f64,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DetectionResult {
    /// Result with a usable score. Both values are clamped to [0, 1].
    pub fn scored(score: f64, confidence: f64) -> Self {
        Self {
            score: score.clamp(0.0, 1.0),
            confidence: confidence.clamp(0.0, 1.0),
            metadata: HashMap::new(),
            error: None,
        }
    }

    /// Neutral result: a raw metric was computed but no calibrated mapping
    /// to a probability exists (score 0.5, confidence as given).
    pub fn neutral(confidence: f64) -> Self {
        Self::scored(0.5, confidence)
    }

    /// Failed result: the signal could not produce a meaningful score.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            score: 0.0,
            confidence: 0.0,
            metadata: HashMap::new(),
            error: Some(message.into()),
        }
    }

    /// Attach a metadata entry (builder style).
    pub fn with_metadata(mut self, key: &str, value: serde_json::Value) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

// ============ Modality Tag ============

/// Input modality class a signal operates on. Used as a routing tag by
/// external orchestration code; signals still validate their own input.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dtype {
    Text,
    Image,
    Audio,
    Video,
    File,
}

impl Dtype {
    pub fn from_str(val: &str) -> Option<Self> {
        match val.trim().to_lowercase().as_str() {
            "text" => Some(Self::Text),
            "image" => Some(Self::Image),
            "audio" => Some(Self::Audio),
            "video" => Some(Self::Video),
            "file" => Some(Self::File),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::File => "file",
        }
    }
}

// ============ Signal Input ============

/// Decoded pixel buffer, row-major, `channels` interleaved bytes per pixel.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

/// Decoded mono audio clip.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl AudioClip {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self { samples, sample_rate }
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate as f64
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }
}

/// Closed sum of input representations a signal may receive.
///
/// Each signal validates by exhaustive match at the top of `run` and rejects
/// variants outside its modality with a documented error message.
#[derive(Debug, Clone)]
pub enum SignalInput {
    Text(String),
    Path(PathBuf),
    Image(ImageData),
    Audio(AudioClip),
}

impl SignalInput {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn path(p: impl Into<PathBuf>) -> Self {
        Self::Path(p.into())
    }
}

// ============ Evaluation Labels ============

/// Ground-truth label for an evaluation sample.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub enum Label {
    Human,
    Ai,
}

impl Label {
    pub fn from_int(val: i32) -> Option<Self> {
        match val {
            0 => Some(Self::Human),
            1 => Some(Self::Ai),
            _ => None,
        }
    }

    pub fn as_int(&self) -> i32 {
        match self {
            Self::Human => 0,
            Self::Ai => 1,
        }
    }
}

// ============ Evaluation Report ============

/// Classification metrics computed over the non-error score/label pairs.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub accuracy: f64,
    pub auroc: f64,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// Per-signal aggregate produced by the evaluation harness.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationReport {
    pub signal_name: String,
    pub num_samples: i32,
    pub num_errors: i32,
    pub metrics: Metrics,
    pub report_id: String,
    pub ts: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scored_clamps_bounds() {
        let result = DetectionResult::scored(1.7, -0.2);
        assert_eq!(result.score, 1.0);
        assert_eq!(result.confidence, 0.0);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_failure_zeroes_score_and_confidence() {
        let result = DetectionResult::failure("Input must be a string.");
        assert_eq!(result.score, 0.0);
        assert_eq!(result.confidence, 0.0);
        assert!(result.is_error());
    }

    #[test]
    fn test_dtype_round_trip() {
        for dtype in [Dtype::Text, Dtype::Image, Dtype::Audio, Dtype::Video, Dtype::File] {
            assert_eq!(Dtype::from_str(dtype.as_str()), Some(dtype));
        }
        assert_eq!(Dtype::from_str("midi"), None);
    }

    #[test]
    fn test_audio_clip_helpers() {
        let clip = AudioClip::new(vec![0.0, 0.5, -0.8, 0.1], 4);
        assert_eq!(clip.duration_secs(), 1.0);
        assert_eq!(clip.peak(), 0.8);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = DetectionResult::scored(0.9, 1.0)
            .with_metadata("isAiSigned", serde_json::json!(true));
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["score"], 0.9);
        assert_eq!(json["metadata"]["isAiSigned"], true);
        assert!(json.get("error").is_none());
    }
}
