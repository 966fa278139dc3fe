use serde::{Deserialize, Serialize};

/// Lifecycle state of a download session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadStatus {
    Pending,
    Downloading,
    Paused,
    Error,
    Completed,
}

impl DownloadStatus {
    /// Lowercase name used in persisted history rows.
    pub fn as_str(&self) -> &'static str {
        match self {
            DownloadStatus::Pending => "pending",
            DownloadStatus::Downloading => "downloading",
            DownloadStatus::Paused => "paused",
            DownloadStatus::Error => "error",
            DownloadStatus::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(DownloadStatus::Pending),
            "downloading" => Some(DownloadStatus::Downloading),
            "paused" => Some(DownloadStatus::Paused),
            "error" => Some(DownloadStatus::Error),
            "completed" => Some(DownloadStatus::Completed),
            _ => None,
        }
    }

    /// Paused and errored sessions can be restarted with a new backend transfer.
    pub fn is_resumable(&self) -> bool {
        matches!(self, DownloadStatus::Paused | DownloadStatus::Error)
    }
}

impl std::fmt::Display for DownloadStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One logical user-initiated download.
///
/// `id` is the identifier of the current backend transfer and changes on
/// every resume. Everything else identifying the download (source, folder,
/// filename, creation time) stays fixed for its whole life.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadSession {
    pub id: String,
    pub source_url: String,
    pub destination_directory: String,
    pub filename: String,
    pub total_bytes: Option<u64>,
    pub downloaded_bytes: u64,
    pub transfer_rate: u64,
    pub status: DownloadStatus,
    /// Set by a local pause request until the backend confirms it. While
    /// set, `Paused` is only optimistic and a progress event overrides it.
    #[serde(default)]
    pub pause_requested: bool,
    pub error_detail: Option<String>,
    pub entity_tag: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl DownloadSession {
    /// Full path of the destination file.
    pub fn destination_path(&self) -> String {
        crate::managers::filename_resolver::join_destination(
            &self.destination_directory,
            &self.filename,
        )
    }

    /// Download progress in percent, if the total size is known.
    pub fn percent(&self) -> Option<u32> {
        match self.total_bytes {
            Some(0) | None => None,
            Some(total) => Some(((self.downloaded_bytes.min(total) * 100) / total) as u32),
        }
    }
}

/// Persisted shape of a [`DownloadSession`]. The transfer rate and the
/// pending-pause marker are volatile and never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: String,
    pub source_url: String,
    pub destination_directory: String,
    pub filename: String,
    pub total_bytes: Option<u64>,
    pub downloaded_bytes: u64,
    pub status: DownloadStatus,
    pub error_detail: Option<String>,
    pub entity_tag: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}
