// Manifest Readers
// The seam between the provenance signal and the container-parsing backend.

use std::path::Path;
use thiserror::Error;

use super::manifest::{Manifest, ManifestStore};
use crate::services::signal::SignalError;

#[derive(Error, Debug)]
pub enum ManifestReadError {
    #[error("failed to read asset: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse manifest data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Reads a manifest store out of an asset, optionally bound to sidecar
/// bytes. `Ok(None)` means the reader found no claim at all, a valid
/// outcome distinct from a read failure.
pub trait ManifestReader {
    /// Probe for the backend's own runtime requirements. Backends wrapping
    /// an external container-parsing library report its absence here.
    fn check_available(&self) -> Result<(), SignalError> {
        Ok(())
    }

    fn read_manifest(
        &self,
        asset: &Path,
        sidecar: Option<&[u8]>,
    ) -> Result<Option<ManifestStore>, ManifestReadError>;
}

/// Reader for JSON manifest-store reports, the serialized form emitted by
/// C2PA tooling. Sidecar bytes are parsed directly; without a sidecar the
/// asset itself is consulted and counts as carrying an embedded manifest
/// when it is such a report. Binary assets resolve to no manifest;
/// cryptographic container extraction belongs to an external backend.
#[derive(Debug, Default)]
pub struct JsonManifestReader;

impl JsonManifestReader {
    fn parse_store(bytes: &[u8]) -> Result<Option<ManifestStore>, ManifestReadError> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;
        if value.get("manifests").is_some() {
            let store: ManifestStore = serde_json::from_value(value)?;
            return Ok(Some(store));
        }
        if value.get("assertions").is_some() {
            let manifest: Manifest = serde_json::from_value(value)?;
            return Ok(Some(ManifestStore::from_single(manifest)));
        }
        Ok(None)
    }
}

impl ManifestReader for JsonManifestReader {
    fn read_manifest(
        &self,
        asset: &Path,
        sidecar: Option<&[u8]>,
    ) -> Result<Option<ManifestStore>, ManifestReadError> {
        if let Some(bytes) = sidecar {
            return Self::parse_store(bytes);
        }

        let bytes = std::fs::read(asset)?;
        if !looks_like_json(&bytes) {
            return Ok(None);
        }
        Self::parse_store(&bytes)
    }
}

fn looks_like_json(bytes: &[u8]) -> bool {
    bytes
        .iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|b| *b == b'{')
}
