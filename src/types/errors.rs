use thiserror::Error;

use super::download::DownloadStatus;

// === BackendError ===

/// Errors reported by the transfer backend for a request.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend refused to start or continue a transfer.
    #[error("Transfer rejected: {0}")]
    Rejected(String),
    /// The backend does not know the given transfer id.
    #[error("Transfer not found: {0}")]
    UnknownTransfer(String),
    /// A file system request (exists, delete, storage query) failed.
    #[error("Backend file system error: {0}")]
    FileSystem(String),
    /// The backend could not be reached.
    #[error("Transfer backend unavailable: {0}")]
    Unavailable(String),
}

// === SessionError ===

/// Errors surfaced by session registry operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No destination folder has been selected.
    #[error("No download folder selected")]
    Configuration,
    /// A backend request made on behalf of the operation failed.
    #[error("Backend request failed: {0}")]
    Backend(#[from] BackendError),
    /// No session is registered under the given id.
    #[error("Download session not found: {0}")]
    NotFound(String),
    /// The session's status does not allow the requested action.
    #[error("Cannot {action} download {id} while it is {status}")]
    InvalidState {
        id: String,
        status: DownloadStatus,
        action: &'static str,
    },
}

// === PersistenceError ===

/// Errors related to the download history store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Database operation failed.
    #[error("History database error: {0}")]
    Database(String),
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(e: rusqlite::Error) -> Self {
        PersistenceError::Database(e.to_string())
    }
}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    #[error("Settings I/O error: {0}")]
    Io(String),
    /// Failed to serialize or deserialize settings.
    #[error("Settings serialization error: {0}")]
    Serialization(String),
    /// The provided settings key is invalid.
    #[error("Invalid settings key: {0}")]
    InvalidKey(String),
    /// The provided settings value is invalid.
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

// === UpdateError ===

/// Errors related to update checks and installation.
#[derive(Debug, Error)]
pub enum UpdateError {
    /// A network error occurred while checking for or downloading updates.
    #[error("Update network error: {0}")]
    Network(String),
    /// The downloaded file's checksum does not match the expected value.
    #[error("Update checksum mismatch: {0}")]
    ChecksumMismatch(String),
    /// Failed to install the update.
    #[error("Update installation failed: {0}")]
    InstallFailed(String),
    /// Failed to parse update information.
    #[error("Update parse error: {0}")]
    Parse(String),
}
