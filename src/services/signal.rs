// Signal Contract
// The capability interface every detection signal implements

use thiserror::Error;

use crate::models::{DetectionResult, Dtype, SignalInput};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SignalError {
    /// A heavy runtime requirement of the signal is not available. The
    /// message is the contract surface: callers substring-match the package
    /// name for diagnostics, and the install hint is shown verbatim.
    #[error("The '{package}' capability is required for this signal. {install_hint}")]
    MissingDependency {
        package: String,
        install_hint: String,
    },
}

impl SignalError {
    pub fn missing_dependency(package: impl Into<String>, install_hint: impl Into<String>) -> Self {
        Self::MissingDependency {
            package: package.into(),
            install_hint: install_hint.into(),
        }
    }
}

/// A pluggable AI-content detector.
///
/// Implementations are constructed once and reused across many `run` calls;
/// any lazily loaded state must be idempotent to initialize. Instances are
/// not required to be thread-safe; callers needing parallelism should use
/// one instance per worker.
pub trait Signal {
    /// Stable identifier, unique across the signal roster; used as the key
    /// in evaluation reports.
    fn name(&self) -> &str;

    /// Input modality class this signal operates on.
    fn dtype(&self) -> Dtype;

    /// Probe for heavy runtime requirements. Must be idempotent and free of
    /// side effects beyond returning the error. The default implementation
    /// declares no requirements.
    fn check_dependencies(&self) -> Result<(), SignalError> {
        Ok(())
    }

    /// Execute the detection logic.
    ///
    /// Never fails for recoverable problems: wrong input variant, unmet
    /// dependencies, unreadable files, and degenerate inputs are all
    /// reported through `DetectionResult::error`. Validation order is input
    /// shape, then dependencies, then modality-specific load checks, then
    /// scoring. Only genuine programming errors may panic.
    fn run(&self, input: &SignalInput) -> DetectionResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SignalInput;

    struct BrokenSignal;

    impl Signal for BrokenSignal {
        fn name(&self) -> &str {
            "broken"
        }

        fn dtype(&self) -> Dtype {
            Dtype::Audio
        }

        fn check_dependencies(&self) -> Result<(), SignalError> {
            Err(SignalError::missing_dependency(
                "librosa",
                "Install it with `cargo add verisig --features audio-decode`.",
            ))
        }

        fn run(&self, _input: &SignalInput) -> DetectionResult {
            match self.check_dependencies() {
                Ok(()) => DetectionResult::neutral(0.5),
                Err(e) => DetectionResult::failure(e.to_string()),
            }
        }
    }

    #[test]
    fn test_dependency_error_message_names_package() {
        let err = BrokenSignal.check_dependencies().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("librosa"));
        assert!(message.contains("Install it with"));
    }

    #[test]
    fn test_check_dependencies_is_idempotent() {
        let signal = BrokenSignal;
        let first = signal.check_dependencies().unwrap_err();
        let second = signal.check_dependencies().unwrap_err();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_run_normalizes_dependency_error() {
        let result = BrokenSignal.run(&SignalInput::text("hello"));
        assert_eq!(result.score, 0.0);
        assert_eq!(result.confidence, 0.0);
        assert!(result.error.as_deref().unwrap().contains("librosa"));
    }

    #[test]
    fn test_name_and_dtype_are_stable() {
        let signal = BrokenSignal;
        assert_eq!(signal.name(), "broken");
        assert_eq!(signal.name(), "broken");
        assert_eq!(signal.dtype(), Dtype::Audio);
        let _ = signal.run(&SignalInput::text("x"));
        assert_eq!(signal.name(), "broken");
        assert_eq!(signal.dtype(), Dtype::Audio);
    }
}
