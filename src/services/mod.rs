// Verisig Core Services
// Signal contract, provenance verification, evaluation, and shared numerics

pub mod confidence;
pub mod eval;
pub mod provenance;
pub mod signal;
pub mod signals;
pub mod text_stats;

pub use signal::{Signal, SignalError};

pub use confidence::{
    default_confidence_for_heuristic, distance_confidence, entropy_confidence, margin_confidence,
    margin_confidence_top_k, softmax_confidence, variance_confidence,
};

pub use provenance::{
    resolve_sidecar, scan_assertions, Assertion, AssertionScan, C2paSignal, JsonManifestReader,
    Manifest, ManifestReadError, ManifestReader, ManifestStore,
};

pub use eval::{
    auroc, calculate_metrics, evaluate_signal, EvalSample, EvaluationDataset, DECISION_THRESHOLD,
};

pub use signals::{DummyTextSignal, FrequencyArtifactsSignal, StylometrySignal, ZlibEntropySignal};
