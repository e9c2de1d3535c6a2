//! Rejection taxonomy.

use crate::schema::SchemaViolation;
use thiserror::Error;

/// Every way a verification pass can reject.
///
/// All variants map to the same external outcome (non-zero exit plus one
/// diagnostic line) but remain distinguishable for diagnostics and tests.
/// No variant is ever downgraded to acceptance.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The deployment is broken: the schema definition is absent or cannot
    /// be parsed. Distinct from any failure of the document under test.
    #[error("provenance schema missing or unreadable: {0}")]
    Configuration(String),
    /// The provenance document is absent, unreadable, or not valid JSON.
    #[error("cannot read provenance document: {0}")]
    Input(String),
    /// The document fails structural validation against the schema.
    #[error("schema violation: {0}")]
    Schema(#[from] SchemaViolation),
    /// A referenced artifact does not exist at its expected location (or
    /// became unreadable before it could be hashed).
    #[error("missing artifact {name}")]
    ArtifactMissing {
        /// Artifact file name, relative to the deployment root.
        name: String,
    },
    /// The recomputed digest differs from the recorded one.
    #[error("hash mismatch for {name}")]
    HashMismatch {
        /// Artifact file name, relative to the deployment root.
        name: String,
        /// Digest recorded in the provenance document.
        expected: String,
        /// Digest recomputed from the artifact's bytes.
        actual: String,
    },
}
