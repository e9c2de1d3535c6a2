//! abe-verify - fail-closed provenance verification CLI.
//!
//! Thin wrapper over the `abe-verifier` library. The whole external contract
//! is: exit 0 plus one confirmation line on stdout iff verified; exit 1 plus
//! one diagnostic line on stderr for every rejection, including bad argument
//! counts. Nothing is written to disk.

use abe_verifier::{Verdict, Verifier};
use clap::Parser;
use std::path::{Path, PathBuf};

const USAGE: &str = "USAGE: abe-verify <path/to/provenance.json>";

#[derive(Parser)]
#[command(name = "abe-verify")]
#[command(about = "Verifies a provenance document against the deployed schema and artifact hashes")]
struct Cli {
    /// Path to the provenance document
    provenance: PathBuf,
}

/// Resolves the deployment root from the executable's own location.
///
/// The deployed layout is `ROOT/bin/abe-verify`, with `schemas/` and the
/// artifacts directly under `ROOT`. Deliberately not configurable: the root
/// is part of the deployment, never attacker-supplied input.
fn deployment_root() -> Result<PathBuf, String> {
    let exe = std::env::current_exe()
        .map_err(|e| format!("cannot locate verifier executable: {e}"))?;
    exe.parent()
        .and_then(Path::parent)
        .map(Path::to_path_buf)
        .ok_or_else(|| "verifier executable has no deployment root".to_string())
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
        Verdict::Verified => println!("OK: provenance verified"),
        Verdict::Rejected(reason) => {
            eprintln!("ERROR: {reason}");
            std::process::exit(1);
        }
    }
}
