//! Typed provenance document model.
//!
//! Deserialized only after the raw document has passed schema validation.
//! The core interprets exactly one section, `output_integrity`; every other
//! top-level field is carried opaquely and left to the schema contract and
//! downstream consumers.

use serde::Deserialize;
use serde_json::{Map, Value};

/// A schema-validated provenance record, as seen by the verifier.
#[derive(Debug, Clone, Deserialize)]
pub struct ProvenanceDocument {
    /// Recorded content hashes of the artifacts this record attests to.
    pub output_integrity: OutputIntegrity,
    /// All other top-level fields (engine identity, determinism flags, ...).
    /// Present for completeness; never interpreted here.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `output_integrity` section: expected hex digests per artifact.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputIntegrity {
    /// Expected SHA-256 of `execution_output.json`.
    pub execution_output_hash: String,
    /// Expected SHA-256 of `report.json`.
    pub report_json_hash: String,
    /// Expected SHA-256 of `report.md`, when that artifact was produced.
    /// Absent or null means the artifact is not part of this record.
    #[serde(default)]
    pub report_md_hash: Option<String>,
}
