//! Streaming SHA-256 hashing for provenance artifacts.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Fixed read chunk size. Artifacts may be large; memory use stays bounded.
const CHUNK_SIZE: usize = 8192;

/// Computes the SHA-256 digest of a file's full byte content and returns it
/// as a lowercase hex string.
///
/// The file is read incrementally in fixed-size chunks, so the whole content
/// is never held in memory at once.
///
/// # Errors
///
/// Returns the underlying [`std::io::Error`] if the file cannot be opened or
/// read.
pub fn sha256_file(path: &Path) -> std::io::Result<String> {
    let mut file = File::open(path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; CHUNK_SIZE];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}
