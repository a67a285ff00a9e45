// Audio Signals
// Frame-wise micro-texture heuristic over decoded clips. Degenerate inputs
// (empty, too short, silent) are distinct recoverable errors: the detector
// cannot do its job, which is not the same as the clip being invalid.

use serde_json::json;
use tracing::debug;

use crate::models::{DetectionResult, Dtype, SignalInput};
use crate::services::confidence::{default_confidence_for_heuristic, variance_confidence};
use crate::services::signal::Signal;

const FRAME_MILLIS: u32 = 50;
const MIN_DURATION_SECS: f64 = 0.25;
const SILENCE_PEAK: f32 = 1e-4;

/// Frame-to-frame variance a natural recording is expected to show in its
/// zero-crossing rate; uniformity beyond this reads as synthetic.
const EXPECTED_ZCR_VARIANCE: f64 = 5e-4;

/// Zero-crossing micro-texture uniformity heuristic.
///
/// Natural recordings drift: room tone, breaths and articulation make the
/// per-frame zero-crossing rate wander. Heavily vocoded or synthesized audio
/// tends to hold an unnaturally steady micro-texture, so high frame-to-frame
/// uniformity nudges the score up. This is a coarse heuristic; its baseline
/// confidence comes from the shared heuristic table.
#[derive(Debug, Default)]
pub struct FrequencyArtifactsSignal;

impl Signal for FrequencyArtifactsSignal {
    fn name(&self) -> &str {
        "frequency_artifacts"
    }

    fn dtype(&self) -> Dtype {
        Dtype::Audio
    }

    fn run(&self, input: &SignalInput) -> DetectionResult {
        let clip = match input {
            SignalInput::Audio(clip) => clip,
            SignalInput::Path(_) => {
                return DetectionResult::failure(
                    "Audio file decoding is not supported; provide a decoded audio clip.",
                )
            }
            _ => {
                return DetectionResult::failure(
                    "Input must be an audio clip or a file path string.",
                )
            }
        };

        if clip.sample_rate == 0 {
            return DetectionResult::failure("Audio sample rate must be positive.");
        }
        if clip.samples.is_empty() {
            return DetectionResult::failure("Audio input is empty.");
        }
        if clip.duration_secs() < MIN_DURATION_SECS {
            return DetectionResult::failure("Audio clip is too short for analysis.");
        }
        if clip.peak() < SILENCE_PEAK {
            return DetectionResult::failure("Audio is silent.");
        }

        let frame_len = (clip.sample_rate * FRAME_MILLIS / 1000).max(1) as usize;
        let frame_zcrs: Vec<f64> = clip
            .samples
            .chunks(frame_len)
            .filter(|frame| frame.len() > 1)
            .map(|frame| zero_crossing_rate(frame))
            .collect();

        if frame_zcrs.len() < 2 {
            return DetectionResult::failure("Audio clip is too short for analysis.");
        }

        let n = frame_zcrs.len() as f64;
        let mean_zcr = frame_zcrs.iter().sum::<f64>() / n;
        let zcr_variance = frame_zcrs.iter().map(|z| (z - mean_zcr).powi(2)).sum::<f64>() / n;

        let uniformity = variance_confidence(&frame_zcrs, Some(EXPECTED_ZCR_VARIANCE), true);
        let score = (0.25 + uniformity * 0.5).clamp(0.02, 0.98);
        debug!(frames = frame_zcrs.len(), mean_zcr, zcr_variance, "audio texture computed");

        DetectionResult::scored(score, default_confidence_for_heuristic(self.name()))
            .with_metadata("mean_zcr", json!(mean_zcr))
            .with_metadata("zcr_variance", json!(zcr_variance))
            .with_metadata("uniformity", json!(uniformity))
            .with_metadata("frames", json!(frame_zcrs.len()))
    }
}

fn zero_crossing_rate(frame: &[f32]) -> f64 {
    let crossings = frame
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();
    crossings as f64 / (frame.len() - 1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AudioClip;

    const SR: u32 = 8000;

    fn sine(freq: f64, secs: f64) -> AudioClip {
        let count = (SR as f64 * secs) as usize;
        let samples = (0..count)
            .map(|i| (2.0 * std::f64::consts::PI * freq * i as f64 / SR as f64).sin() as f32)
            .collect();
        AudioClip::new(samples, SR)
    }

    fn pseudo_noise(secs: f64) -> AudioClip {
        // Deterministic LCG noise so the test has no RNG dependency.
        let count = (SR as f64 * secs) as usize;
        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let samples = (0..count)
            .map(|_| {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                ((state >> 32) as f64 / (1u64 << 31) as f64 - 1.0) as f32
            })
            .collect();
        AudioClip::new(samples, SR)
    }

    #[test]
    fn test_uniform_tone_scores_above_noise() {
        let signal = FrequencyArtifactsSignal;
        let tone = signal.run(&SignalInput::Audio(sine(440.0, 1.0)));
        let noise = signal.run(&SignalInput::Audio(pseudo_noise(1.0)));
        assert!(tone.error.is_none());
        assert!(noise.error.is_none());
        assert!(tone.score > noise.score);
        assert_eq!(tone.confidence, 0.3);
    }

    #[test]
    fn test_empty_audio_error() {
        let result = FrequencyArtifactsSignal.run(&SignalInput::Audio(AudioClip::new(vec![], SR)));
        assert_eq!(result.error.as_deref(), Some("Audio input is empty."));
    }

    #[test]
    fn test_short_clip_error() {
        let result = FrequencyArtifactsSignal.run(&SignalInput::Audio(sine(440.0, 0.1)));
        assert_eq!(
            result.error.as_deref(),
            Some("Audio clip is too short for analysis.")
        );
    }

    #[test]
    fn test_silent_clip_error() {
        let clip = AudioClip::new(vec![0.0; SR as usize], SR);
        let result = FrequencyArtifactsSignal.run(&SignalInput::Audio(clip));
        assert_eq!(result.error.as_deref(), Some("Audio is silent."));
    }

    #[test]
    fn test_zero_sample_rate_error() {
        let clip = AudioClip::new(vec![0.5; 100], 0);
        let result = FrequencyArtifactsSignal.run(&SignalInput::Audio(clip));
        assert_eq!(result.error.as_deref(), Some("Audio sample rate must be positive."));
    }

    #[test]
    fn test_path_input_reports_missing_decoder() {
        let result = FrequencyArtifactsSignal.run(&SignalInput::path("/tmp/clip.wav"));
        assert!(result.error.as_deref().unwrap().contains("decoded audio clip"));
    }

    #[test]
    fn test_foreign_input_rejected() {
        let result = FrequencyArtifactsSignal.run(&SignalInput::text("not audio"));
        assert_eq!(
            result.error.as_deref(),
            Some("Input must be an audio clip or a file path string.")
        );
    }

    #[test]
    fn test_metadata_carries_raw_features() {
        let result = FrequencyArtifactsSignal.run(&SignalInput::Audio(sine(440.0, 0.5)));
        assert!(result.metadata["mean_zcr"].as_f64().unwrap() > 0.0);
        assert!(result.metadata["frames"].as_u64().unwrap() >= 2);
    }
}
