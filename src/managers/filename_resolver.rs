//! Destination filename collision avoidance.
//!
//! New downloads must not overwrite an existing file in the destination
//! folder. Candidates are derived deterministically from the requested
//! name (`report.pdf` -> `report-1.pdf`, `archive` -> `archive(1)`) and
//! probed through the backend until a free one is found.

use std::path::Path;

use crate::services::transfer_backend::TransferBackendTrait;
use crate::types::errors::BackendError;

/// Highest suffix probed before giving up and returning the last candidate.
pub const MAX_COLLISION_SUFFIX: u32 = 100;

/// Joins a destination folder and filename with the platform separator.
pub fn join_destination(directory: &str, filename: &str) -> String {
    Path::new(directory).join(filename).to_string_lossy().to_string()
}

/// Splits `filename` at its last `.` into name and extension (dot included).
///
/// A leading dot (`.bashrc`) marks a hidden file, not an extension.
fn split_extension(filename: &str) -> Option<(&str, &str)> {
    match filename.rfind('.') {
        Some(idx) if idx > 0 => Some((&filename[..idx], &filename[idx..])),
        _ => None,
    }
}

/// Builds the collision candidate for `suffix`.
pub fn generate_candidate(filename: &str, suffix: u32) -> String {
    match split_extension(filename) {
        Some((name, ext)) => format!("{}-{}{}", name, suffix, ext),
        None => format!("{}({})", filename, suffix),
    }
}

/// Returns the first candidate, starting at suffix 1, with no file in
/// `directory`.
///
/// Past [`MAX_COLLISION_SUFFIX`] the last candidate is returned even if it
/// exists, so the result is not guaranteed to be free.
pub async fn find_available_filename<B: TransferBackendTrait>(
    backend: &B,
    directory: &str,
    filename: &str,
) -> Result<String, BackendError> {
    let mut candidate = generate_candidate(filename, 1);
    for suffix in 1..=MAX_COLLISION_SUFFIX {
        candidate = generate_candidate(filename, suffix);
        if !backend.file_exists(&join_destination(directory, &candidate)).await? {
            return Ok(candidate);
        }
    }
    tracing::warn!(
        filename,
        candidate = %candidate,
        "collision avoidance exhausted, reusing last candidate"
    );
    Ok(candidate)
}

/// Keeps `filename` if it is free in `directory`, otherwise picks a free
/// candidate with [`find_available_filename`].
pub async fn resolve_filename<B: TransferBackendTrait>(
    backend: &B,
    directory: &str,
    filename: &str,
) -> Result<String, BackendError> {
    if backend.file_exists(&join_destination(directory, filename)).await? {
        find_available_filename(backend, directory, filename).await
    } else {
        Ok(filename.to_string())
    }
}
