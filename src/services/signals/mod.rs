// Baseline Signals
// Concrete detectors exercising the signal contract per modality:
// - text: dummy keyword baseline, zlib compression ratio, stylometry
// - audio: zero-crossing micro-texture uniformity

pub mod audio;
pub mod text;

pub use audio::FrequencyArtifactsSignal;
pub use text::{DummyTextSignal, StylometrySignal, ZlibEntropySignal};
