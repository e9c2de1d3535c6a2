//! End-to-end verification tests over throwaway deployment trees.

use abe_verifier::{sha256_file, Verdict, Verifier, VerifyError, SchemaViolation};
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCHEMA_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../schemas/provenance.schema.json"));

/// A deployment tree: schema under schemas/, artifacts and the provenance
/// document at the root.
struct Deployment {
    dir: TempDir,
}

impl Deployment {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("schemas")).unwrap();
        fs::write(dir.path().join("schemas/provenance.schema.json"), SCHEMA_JSON).unwrap();
        Deployment { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn write_artifact(&self, name: &str, content: &[u8]) -> String {
        let path = self.root().join(name);
        fs::write(&path, content).unwrap();
        sha256_file(&path).unwrap()
    }

    fn write_document(&self, document: &Value) -> PathBuf {
        let path = self.root().join("provenance.json");
        fs::write(&path, serde_json::to_string_pretty(document).unwrap()).unwrap();
        path
    }

    fn verify(&self, document: &Value) -> Verdict {
        let path = self.write_document(document);
        Verifier::new(self.root()).verify(&path)
    }
}

fn valid_document(exec_hash: &str, report_hash: &str) -> Value {
    json!({
        "schema_version": "1.0",
        "engine_identity": {
            "engine_name": "GOD Engine",
            "engine_version": "2.3.1"
        },
        "determinism_declaration": {
            "deterministic": true,
            "external_calls": false,
            "side_effects": false
        },
        "output_integrity": {
            "execution_output_hash": exec_hash,
            "report_json_hash": report_hash
        }
    })
}

/// Standard two-artifact deployment with a document whose hashes match.
fn verified_fixture() -> (Deployment, Value) {
    let dep = Deployment::new();
    let exec_hash = dep.write_artifact("execution_output.json", br#"{"result": 42}"#);
    let report_hash = dep.write_artifact("report.json", br#"{"status": "complete"}"#);
    let doc = valid_document(&exec_hash, &report_hash);
    (dep, doc)
}

#[test]
fn verifies_when_schema_and_all_hashes_match() {
    let (dep, doc) = verified_fixture();
    let verdict = dep.verify(&doc);
    assert!(verdict.is_verified(), "expected Verified, got {verdict:?}");
    assert_eq!(verdict.exit_code(), 0);
}

#[test]
fn rejects_tampered_artifact_with_hash_mismatch() {
    let (dep, doc) = verified_fixture();
    // Flip content after the document recorded its hash.
    fs::write(dep.root().join("report.json"), br#"{"status": "tampered"}"#).unwrap();

    match dep.verify(&doc) {
        Verdict::Rejected(VerifyError::HashMismatch { name, expected, actual }) => {
            assert_eq!(name, "report.json");
            assert_ne!(expected, actual);
        }
        other => panic!("expected HashMismatch, got {other:?}"),
    }
}

#[test]
fn rejects_mutated_recorded_hash_with_hash_mismatch() {
    let (dep, mut doc) = verified_fixture();
    // Valid hex, but not the artifact's digest.
    doc["output_integrity"]["execution_output_hash"] =
        json!("0000000000000000000000000000000000000000000000000000000000000000");

    match dep.verify(&doc) {
        Verdict::Rejected(VerifyError::HashMismatch { name, .. }) => {
            assert_eq!(name, "execution_output.json");
        }
        other => panic!("expected HashMismatch, got {other:?}"),
    }
}

#[test]
fn deleted_artifact_is_missing_never_a_false_mismatch() {
    let (dep, doc) = verified_fixture();
    fs::remove_file(dep.root().join("execution_output.json")).unwrap();

    match dep.verify(&doc) {
        Verdict::Rejected(VerifyError::ArtifactMissing { name }) => {
            assert_eq!(name, "execution_output.json");
        }
        other => panic!("expected ArtifactMissing, got {other:?}"),
    }
}

#[test]
fn rejects_missing_required_field_as_schema_violation() {
    let (dep, mut doc) = verified_fixture();
    doc["output_integrity"]
        .as_object_mut()
        .unwrap()
        .remove("report_json_hash");

    match dep.verify(&doc) {
        Verdict::Rejected(VerifyError::Schema(SchemaViolation::MissingField { path })) => {
            assert_eq!(path, "$.output_integrity.report_json_hash");
        }
        other => panic!("expected MissingField, got {other:?}"),
    }
}

#[test]
fn rejects_wrong_typed_field_as_schema_violation() {
    let (dep, mut doc) = verified_fixture();
    doc["determinism_declaration"]["deterministic"] = json!("yes");

    match dep.verify(&doc) {
        Verdict::Rejected(VerifyError::Schema(SchemaViolation::WrongType { path, .. })) => {
            assert_eq!(path, "$.determinism_declaration.deterministic");
        }
        other => panic!("expected WrongType, got {other:?}"),
    }
}

#[test]
fn rejects_unpinned_engine_name_as_schema_violation() {
    let (dep, mut doc) = verified_fixture();
    doc["engine_identity"]["engine_name"] = json!("Some Other Engine");

    match dep.verify(&doc) {
        Verdict::Rejected(VerifyError::Schema(SchemaViolation::ConstMismatch { path, .. })) => {
            assert_eq!(path, "$.engine_identity.engine_name");
        }
        other => panic!("expected ConstMismatch, got {other:?}"),
    }
}

#[test]
fn absent_secondary_report_hash_does_not_reject() {
    let (dep, doc) = verified_fixture();
    // No report.md artifact and no report_md_hash entry.
    assert!(dep.verify(&doc).is_verified());
}

#[test]
fn null_secondary_report_hash_skips_the_check() {
    let (dep, mut doc) = verified_fixture();
    doc["output_integrity"]["report_md_hash"] = json!(null);
    assert!(dep.verify(&doc).is_verified());
}

#[test]
fn present_secondary_report_hash_is_checked() {
    let (dep, mut doc) = verified_fixture();
    let md_hash = dep.write_artifact("report.md", b"# Report\n\nAll good.\n");
    doc["output_integrity"]["report_md_hash"] = json!(md_hash);
    assert!(dep.verify(&doc).is_verified());

    // Tamper with the secondary report; the verdict must flip.
    fs::write(dep.root().join("report.md"), b"# Report\n\nEdited.\n").unwrap();
    match dep.verify(&doc) {
        Verdict::Rejected(VerifyError::HashMismatch { name, .. }) => {
            assert_eq!(name, "report.md");
        }
        other => panic!("expected HashMismatch, got {other:?}"),
    }
}

#[test]
fn missing_schema_definition_is_a_configuration_error() {
    let (dep, doc) = verified_fixture();
    fs::remove_file(dep.root().join("schemas/provenance.schema.json")).unwrap();

    match dep.verify(&doc) {
        Verdict::Rejected(VerifyError::Configuration(_)) => {}
        other => panic!("expected Configuration, got {other:?}"),
    }
}

#[test]
fn corrupt_schema_definition_is_a_configuration_error() {
    let (dep, doc) = verified_fixture();
    fs::write(
        dep.root().join("schemas/provenance.schema.json"),
        b"{ not json",
    )
    .unwrap();

    match dep.verify(&doc) {
        Verdict::Rejected(VerifyError::Configuration(_)) => {}
        other => panic!("expected Configuration, got {other:?}"),
    }
}

#[test]
fn unparsable_document_is_an_input_error() {
    let dep = Deployment::new();
    let path = dep.root().join("provenance.json");
    fs::write(&path, b"{ this is not json").unwrap();

    match Verifier::new(dep.root()).verify(&path) {
        Verdict::Rejected(VerifyError::Input(_)) => {}
        other => panic!("expected Input, got {other:?}"),
    }
}

#[test]
fn absent_document_is_an_input_error() {
    let dep = Deployment::new();
    let path = dep.root().join("does_not_exist.json");

    match Verifier::new(dep.root()).verify(&path) {
        Verdict::Rejected(VerifyError::Input(_)) => {}
        other => panic!("expected Input, got {other:?}"),
    }
}

#[test]
fn opaque_top_level_fields_are_accepted() {
    let (dep, mut doc) = verified_fixture();
    doc["run_metadata"] = json!({ "host": "ci-worker-3", "attempt": 1 });
    assert!(dep.verify(&doc).is_verified());
}

#[test]
fn hash_comparison_is_case_normalized_exact() {
    let (dep, mut doc) = verified_fixture();
    let upper = doc["output_integrity"]["execution_output_hash"]
        .as_str()
        .unwrap()
        .to_ascii_uppercase();
    doc["output_integrity"]["execution_output_hash"] = json!(upper);
    assert!(dep.verify(&doc).is_verified());
}

#[test]
fn repeated_verification_is_idempotent() {
    let (dep, mut doc) = verified_fixture();
    doc["output_integrity"]["report_json_hash"] =
        json!("ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff");
    let path = dep.write_document(&doc);
    let verifier = Verifier::new(dep.root());

    for _ in 0..3 {
        match verifier.verify(&path) {
            Verdict::Rejected(VerifyError::HashMismatch { name, .. }) => {
                assert_eq!(name, "report.json");
            }
            other => panic!("expected HashMismatch, got {other:?}"),
        }
    }
}
