//! abe-example - minimal app gated on provenance verification.
//!
//! Demonstrates the collaborator contract: call the verifier, treat only a
//! verified verdict as trust, and do nothing with partial state on failure.
//! On success it writes a trivial confirmation output.

use abe_verifier::{Verdict, Verifier};
use clap::Parser;
use std::path::{Path, PathBuf};

const USAGE: &str = "USAGE: abe-example <path/to/provenance.json>";

#[derive(Parser)]
#[command(name = "abe-example")]
#[command(about = "Runs the example app once provenance is verified")]
struct Cli {
    /// Path to the provenance document
    provenance: PathBuf,
}

/// Deployment root, resolved from the executable location (`ROOT/bin/abe-example`).
fn deployment_root() -> Result<PathBuf, String> {
    let exe =
        std::env::current_exe().map_err(|e| format!("cannot locate example executable: {e}"))?;
    exe.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| "example executable has no deployment root".to_string())
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(_) => {
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };

    let root = match deployment_root() {
        Ok(root) => root,
        Err(reason) => {
            eprintln!("ERROR: {reason}");
            std::process::exit(1);
        }
    };

    match Verifier::new(root).verify(&cli.provenance) {
        Verdict::Verified => {}
        Verdict::Rejected(reason) => {
            eprintln!("ERROR: {reason}");
            std::process::exit(1);
        }
    }

    if let Err(e) = std::fs::write(
        "output.txt",
        "OK: GOD provenance verified. Example app completed.\n",
    ) {
        eprintln!("ERROR: cannot write output.txt: {e}");
        std::process::exit(1);
    }
    println!("SUCCESS: example app output written");
}
