// Evaluation Harness
// Runs one signal over a labeled dataset and reduces the per-sample results
// into dataset-level metrics. Signal-agnostic: depends only on the Signal
// and DetectionResult contracts.

pub mod metrics;

pub use metrics::{auroc, calculate_metrics, DECISION_THRESHOLD};

use tracing::{debug, info};

use crate::models::{EvaluationReport, Label, SignalInput};
use crate::services::signal::Signal;

/// One labeled input.
#[derive(Debug, Clone)]
pub struct EvalSample {
    pub input: SignalInput,
    pub label: Label,
}

/// An ordered, immutable collection of labeled samples.
#[derive(Debug, Clone, Default)]
pub struct EvaluationDataset {
    samples: Vec<EvalSample>,
}

impl EvaluationDataset {
    pub fn from_pairs(pairs: impl IntoIterator<Item = (SignalInput, Label)>) -> Self {
        Self {
            samples: pairs
                .into_iter()
                .map(|(input, label)| EvalSample { input, label })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[EvalSample] {
        &self.samples
    }
}

/// Evaluate a signal over a dataset.
///
/// Samples are processed strictly sequentially. A sample whose result
/// carries an error is counted and excluded from the metrics; it is never
/// treated as a wrong prediction, and it never aborts the batch.
pub fn evaluate_signal(signal: &dyn Signal, dataset: &EvaluationDataset) -> EvaluationReport {
    let mut labels: Vec<Label> = Vec::with_capacity(dataset.len());
    let mut scores: Vec<f64> = Vec::with_capacity(dataset.len());
    let mut num_errors = 0i32;

    for (idx, sample) in dataset.samples().iter().enumerate() {
        let result = signal.run(&sample.input);
        match result.error {
            Some(error) => {
                num_errors += 1;
                debug!(signal = signal.name(), sample = idx, %error, "sample skipped");
            }
            None => {
                labels.push(sample.label);
                scores.push(result.score);
            }
        }
    }

    let metrics = calculate_metrics(&labels, &scores);
    info!(
        signal = signal.name(),
        num_samples = dataset.len(),
        num_errors,
        accuracy = metrics.accuracy,
        auroc = metrics.auroc,
        "evaluation finished"
    );

    EvaluationReport {
        signal_name: signal.name().to_string(),
        num_samples: dataset.len() as i32,
        num_errors,
        metrics,
        report_id: uuid::Uuid::new_v4().to_string(),
        ts: chrono::Utc::now().to_rfc3339(),
    }
}
