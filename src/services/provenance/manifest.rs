// Provenance Manifest Model
// Parsed manifest-store structure and the assertion scan that decides
// whether content is cryptographically signed as AI-generated.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// IPTC digital source type label carrying a single classification value.
pub const IPTC_SOURCE_TYPE_LABEL: &str = "stds.iptc.digitalSourceType";

/// Prefix of the actions assertion family whose entries may carry a
/// `digitalSourceType` field.
pub const ACTIONS_LABEL_PREFIX: &str = "c2pa.actions";

/// A manifest store: the container's own addressing scheme selects one
/// active manifest out of the ingredient chain.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ManifestStore {
    #[serde(default)]
    pub active_manifest: Option<String>,
    #[serde(default)]
    pub manifests: HashMap<String, Manifest>,
}

impl ManifestStore {
    /// The manifest the store designates as active, if any.
    pub fn active(&self) -> Option<&Manifest> {
        self.active_manifest
            .as_ref()
            .and_then(|label| self.manifests.get(label))
    }

    /// Wrap a bare manifest as a store with that manifest active.
    pub fn from_single(manifest: Manifest) -> Self {
        let label = "urn:uuid:active".to_string();
        let mut manifests = HashMap::new();
        manifests.insert(label.clone(), manifest);
        Self {
            active_manifest: Some(label),
            manifests,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Manifest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub claim_generator: Option<String>,
    #[serde(default)]
    pub assertions: Vec<Assertion>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Assertion {
    pub label: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Outcome of scanning every assertion in the active manifest.
#[derive(Debug, Clone, Default)]
pub struct AssertionScan {
    pub is_ai: bool,
    pub found_assertions: Vec<String>,
}

/// True when a digital source type value declares algorithmic media
/// (the plain or the trained variant).
pub fn is_ai_source_type(value: &str) -> bool {
    value.contains("trainedAlgorithmicMedia") || value.contains("algorithmicMedia")
}

/// Scan all assertions of a manifest. Every label is recorded for audit
/// regardless of relevance; the AI flag is a pure OR across the IPTC
/// source-type check and the per-action `digitalSourceType` check, so a
/// match can never be un-set by later assertions. The scan does not
/// short-circuit.
pub fn scan_assertions(manifest: &Manifest) -> AssertionScan {
    let mut scan = AssertionScan::default();

    for assertion in &manifest.assertions {
        scan.found_assertions.push(assertion.label.clone());

        if assertion.label == IPTC_SOURCE_TYPE_LABEL {
            if let Some(val) = assertion.data.get("val").and_then(|v| v.as_str()) {
                if is_ai_source_type(val) {
                    scan.is_ai = true;
                }
            }
        }

        if assertion.label.starts_with(ACTIONS_LABEL_PREFIX) {
            if let Some(actions) = assertion.data.get("actions").and_then(|v| v.as_array()) {
                for action in actions {
                    if let Some(source_type) =
                        action.get("digitalSourceType").and_then(|v| v.as_str())
                    {
                        if is_ai_source_type(source_type) {
                            scan.is_ai = true;
                        }
                    }
                }
            }
        }
    }

    scan
}
