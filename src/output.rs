//! Output artifacts: timestamp-hash file naming and writing

use crate::error::{Error, Result};
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// Extension of every generated document
pub const EXTENSION: &str = "pdf";

/// Attempts at finding a free name before giving up
const MAX_NAME_ATTEMPTS: usize = 8;

/// Nanoseconds since the Unix epoch. A clock set before the epoch is an error.
pub fn timestamp_nanos() -> Result<u128> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .map_err(|e| Error::Other(format!("System clock is before the Unix epoch: {e}")))
}

/// Hex SHA-256 of the timestamp, optionally salted with extra text.
pub fn artifact_stem(nanos: u128, salt: Option<&str>) -> String {
    let input = match salt {
        Some(salt) => format!("{nanos}{salt}"),
        None => nanos.to_string(),
    };
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Write `bytes` to `<dir>/<hash>.pdf`, creating `dir` if needed.
///
/// Existing files are never overwritten; on a name clash the timestamp is
/// sampled again, a bounded number of times.
pub fn write_artifact(dir: &Path, salt: Option<&str>, bytes: &[u8]) -> Result<PathBuf> {
    write_artifact_with(dir, salt, bytes, timestamp_nanos)
}

fn write_artifact_with(
    dir: &Path,
    salt: Option<&str>,
    bytes: &[u8],
    mut clock: impl FnMut() -> Result<u128>,
) -> Result<PathBuf> {
    if !dir.is_dir() {
        fs::create_dir_all(dir).map_err(|e| {
            Error::Io(io::Error::new(
                e.kind(),
                format!("Failed to create output directory {}: {e}", dir.display()),
            ))
        })?;
        tracing::info!("Created output directory: {}", dir.display());
    }

    for _ in 0..MAX_NAME_ATTEMPTS {
        let path = dir
            .join(artifact_stem(clock()?, salt))
            .with_extension(EXTENSION);

        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                if let Err(e) = file.write_all(bytes) {
                    drop(file);
                    if let Err(cleanup) = fs::remove_file(&path) {
                        tracing::warn!("Failed to remove partial {}: {cleanup}", path.display());
                    }
                    return Err(Error::Io(io::Error::new(
                        e.kind(),
                        format!("Failed to write {}: {e}", path.display()),
                    )));
                }
                tracing::debug!(bytes = bytes.len(), "Wrote {}", path.display());
                return Ok(path);
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                tracing::debug!("Output name clash on {}, resampling", path.display());
            }
            Err(e) => {
                return Err(Error::Io(io::Error::new(
                    e.kind(),
                    format!("Failed to create {}: {e}", path.display()),
                )));
            }
        }
    }

    Err(Error::Io(io::Error::new(
        ErrorKind::AlreadyExists,
        format!(
            "No free output name in {} after {MAX_NAME_ATTEMPTS} attempts",
            dir.display()
        ),
    )))
}
