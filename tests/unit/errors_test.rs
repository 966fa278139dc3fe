use fetchdock::types::download::DownloadStatus;
use fetchdock::types::errors::*;

// === BackendError Tests ===

#[test]
fn backend_error_display_variants() {
    assert_eq!(
        BackendError::Rejected("unsupported scheme".to_string()).to_string(),
        "Transfer rejected: unsupported scheme"
    );
    assert_eq!(
        BackendError::UnknownTransfer("t-1".to_string()).to_string(),
        "Transfer not found: t-1"
    );
    assert_eq!(
        BackendError::FileSystem("permission denied".to_string()).to_string(),
        "Backend file system error: permission denied"
    );
    assert_eq!(
        BackendError::Unavailable("socket closed".to_string()).to_string(),
        "Transfer backend unavailable: socket closed"
    );
}

// === SessionError Tests ===

#[test]
fn session_error_configuration_display() {
    assert_eq!(SessionError::Configuration.to_string(), "No download folder selected");
}

#[test]
fn session_error_wraps_backend_error() {
    let err: SessionError = BackendError::Rejected("bad url".to_string()).into();
    assert!(matches!(err, SessionError::Backend(_)));
    assert_eq!(err.to_string(), "Backend request failed: Transfer rejected: bad url");
}

#[test]
fn session_error_backend_has_source() {
    let err: Box<dyn std::error::Error> =
        Box::new(SessionError::Backend(BackendError::Unavailable("down".to_string())));
    assert!(err.source().is_some());
}

#[test]
fn session_error_invalid_state_display() {
    let err = SessionError::InvalidState {
        id: "A".to_string(),
        status: DownloadStatus::Completed,
        action: "pause",
    };
    assert_eq!(err.to_string(), "Cannot pause download A while it is completed");
}

#[test]
fn session_error_not_found_display() {
    assert_eq!(
        SessionError::NotFound("gone".to_string()).to_string(),
        "Download session not found: gone"
    );
}

// === PersistenceError Tests ===

#[test]
fn persistence_error_from_rusqlite() {
    let err: PersistenceError = rusqlite::Error::QueryReturnedNoRows.into();
    assert!(matches!(err, PersistenceError::Database(_)));
    assert!(err.to_string().starts_with("History database error: "));
}

// === SettingsError Tests ===

#[test]
fn settings_error_display_variants() {
    assert_eq!(SettingsError::Io("disk".to_string()).to_string(), "Settings I/O error: disk");
    assert_eq!(
        SettingsError::InvalidKey("nope".to_string()).to_string(),
        "Invalid settings key: nope"
    );
    assert_eq!(
        SettingsError::InvalidValue("theme".to_string()).to_string(),
        "Invalid settings value: theme"
    );
    assert_eq!(
        SettingsError::Serialization("eof".to_string()).to_string(),
        "Settings serialization error: eof"
    );
}

// === UpdateError Tests ===

#[test]
fn update_error_display_variants() {
    assert_eq!(
        UpdateError::ChecksumMismatch("abc".to_string()).to_string(),
        "Update checksum mismatch: abc"
    );
    assert_eq!(UpdateError::Network("dns".to_string()).to_string(), "Update network error: dns");
    assert_eq!(
        UpdateError::InstallFailed("spawn".to_string()).to_string(),
        "Update installation failed: spawn"
    );
    assert_eq!(UpdateError::Parse("json".to_string()).to_string(), "Update parse error: json");
}
