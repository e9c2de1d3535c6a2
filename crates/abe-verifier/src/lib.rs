//! ABE provenance verification core.
//!
//! This crate is the single trust boundary of the repository: given a
//! provenance document and the artifacts it references, it confirms that the
//! document satisfies the deployed schema contract and that every referenced
//! artifact's recomputed SHA-256 digest equals the recorded one.
//!
//! Core invariants:
//! - A document is never partially trusted: schema validation and every hash
//!   comparison must succeed for a [`Verdict::Verified`].
//! - Verification is read-only; the core never creates or modifies files.
//! - Any error, ambiguity, or unmet condition rejects (fail-closed).
//! - One forward pass per invocation; no retries, no shared state.
//!
#![deny(missing_docs)]

/// Streaming content hashing for artifacts.
pub mod digest;
/// Typed provenance document model.
pub mod document;
/// Rejection taxonomy.
pub mod errors;
/// Schema-shape model and structural validation.
pub mod schema;
/// Verification orchestrator and verdict types.
pub mod verifier;

pub use digest::sha256_file;
pub use document::{OutputIntegrity, ProvenanceDocument};
pub use errors::VerifyError;
pub use schema::{validate, SchemaNode, SchemaViolation};
pub use verifier::{Verdict, Verifier, SCHEMA_RELATIVE_PATH};
