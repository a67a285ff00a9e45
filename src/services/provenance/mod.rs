// Provenance Verification
// Content Credentials (C2PA) signal: resolves sidecar or embedded manifests
// and interprets cryptographic assertions. Unlike the statistical signals,
// this is a deterministic parser of an authenticated claim; its only failure
// modes are read errors and the absence of any claim.

pub mod manifest;
pub mod reader;

pub use manifest::{scan_assertions, Assertion, AssertionScan, Manifest, ManifestStore};
pub use reader::{JsonManifestReader, ManifestReadError, ManifestReader};

use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::models::{DetectionResult, Dtype, SignalInput};
use crate::services::signal::{Signal, SignalError};

const INPUT_ERROR: &str = "Input must be a file path string.";

/// Detects Content Credentials manifests in files.
///
/// The manifest source is resolved in order: a `<path>.c2pa` sidecar, then a
/// `<stem>.c2pa` sidecar, then whatever the reader finds embedded in the
/// asset itself. A validated manifest decision (AI-signed or not) always
/// carries confidence 1.0; every error and no-manifest branch carries 0.0,
/// absence of evidence rather than evidence of absence.
pub struct C2paSignal {
    name: String,
    reader: Box<dyn ManifestReader>,
}

impl C2paSignal {
    pub fn new() -> Self {
        Self::with_reader("c2pa_provenance", Box::new(JsonManifestReader))
    }

    /// Provenance checker for image assets.
    pub fn for_image() -> Self {
        Self::with_reader("c2pa_image_provenance", Box::new(JsonManifestReader))
    }

    /// Provenance checker for text documents; these usually carry sidecar
    /// manifests rather than embedded ones.
    pub fn for_text() -> Self {
        Self::with_reader("c2pa_text_provenance", Box::new(JsonManifestReader))
    }

    /// Provenance checker for audio assets.
    pub fn for_audio() -> Self {
        Self::with_reader("c2pa_audio_provenance", Box::new(JsonManifestReader))
    }

    /// Provenance checker for video assets.
    pub fn for_video() -> Self {
        Self::with_reader("c2pa_video_provenance", Box::new(JsonManifestReader))
    }

    /// Construct with a custom container-parsing backend.
    pub fn with_reader(name: impl Into<String>, reader: Box<dyn ManifestReader>) -> Self {
        Self {
            name: name.into(),
            reader,
        }
    }

    fn status_result(status: &str, details: Option<String>, sidecar_used: bool) -> DetectionResult {
        let mut result = DetectionResult::scored(0.0, 0.0)
            .with_metadata("status", json!(status))
            .with_metadata("sidecar_used", json!(sidecar_used));
        if let Some(details) = details {
            result = result.with_metadata("details", json!(details));
        }
        result
    }
}

impl Default for C2paSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Locate a sidecar manifest next to the asset. `<path>.c2pa` wins over
/// `<stem>.c2pa`; for extensionless assets the two candidates coincide.
pub fn resolve_sidecar(asset: &Path) -> Option<PathBuf> {
    let mut appended = asset.as_os_str().to_os_string();
    appended.push(".c2pa");
    let appended = PathBuf::from(appended);
    if appended.exists() {
        return Some(appended);
    }

    let swapped = asset.with_extension("c2pa");
    if swapped != appended && swapped.exists() {
        return Some(swapped);
    }
    None
}

impl Signal for C2paSignal {
    fn name(&self) -> &str {
        &self.name
    }

    fn dtype(&self) -> Dtype {
        Dtype::File
    }

    fn check_dependencies(&self) -> Result<(), SignalError> {
        self.reader.check_available()
    }

    fn run(&self, input: &SignalInput) -> DetectionResult {
        let SignalInput::Path(path) = input else {
            return DetectionResult::failure(INPUT_ERROR);
        };

        if let Err(e) = self.check_dependencies() {
            return DetectionResult::failure(e.to_string());
        }

        // Sidecar resolution: the sidecar's raw bytes are bound to the asset
        // and handed to the reader together with the asset path.
        let mut sidecar_used = false;
        let sidecar_bytes = match resolve_sidecar(path) {
            Some(sidecar_path) => match fs::read(&sidecar_path) {
                Ok(bytes) => {
                    debug!(signal = %self.name, sidecar = %sidecar_path.display(), "sidecar manifest resolved");
                    sidecar_used = true;
                    Some(bytes)
                }
                Err(e) => {
                    warn!(signal = %self.name, sidecar = %sidecar_path.display(), error = %e, "sidecar read failed");
                    return Self::status_result("sidecar_read_error", Some(e.to_string()), false);
                }
            },
            None => None,
        };

        let store = match self.reader.read_manifest(path, sidecar_bytes.as_deref()) {
            Ok(store) => store,
            Err(e) => {
                debug!(signal = %self.name, asset = %path.display(), error = %e, "manifest read failed");
                return Self::status_result("read_error", Some(e.to_string()), sidecar_used);
            }
        };

        let Some(active) = store.as_ref().and_then(|s| s.active()) else {
            return Self::status_result("no_active_manifest", None, sidecar_used);
        };

        let scan = scan_assertions(active);
        debug!(
            signal = %self.name,
            asset = %path.display(),
            is_ai = scan.is_ai,
            assertions = scan.found_assertions.len(),
            "manifest scanned"
        );

        DetectionResult::scored(if scan.is_ai { 1.0 } else { 0.0 }, 1.0)
            .with_metadata("manifest_found", json!(true))
            .with_metadata("is_ai_signed", json!(scan.is_ai))
            .with_metadata("found_assertions", json!(scan.found_assertions))
            .with_metadata("sidecar_used", json!(sidecar_used))
    }
}
