use serde::{Deserialize, Serialize};

/// Push notification from the transfer backend, keyed by backend session id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransferEvent {
    pub session_id: String,
    pub kind: TransferEventKind,
}

impl TransferEvent {
    pub fn new(session_id: impl Into<String>, kind: TransferEventKind) -> Self {
        Self {
            session_id: session_id.into(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransferEventKind {
    Progress {
        downloaded: u64,
        total: Option<u64>,
        rate: u64,
        #[serde(default)]
        entity_tag: Option<String>,
    },
    Completed,
    Failed {
        message: String,
    },
    Paused,
}

impl TransferEventKind {
    /// Progress event without a resumption validator.
    pub fn progress(downloaded: u64, total: Option<u64>, rate: u64) -> Self {
        TransferEventKind::Progress {
            downloaded,
            total,
            rate,
            entity_tag: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        TransferEventKind::Failed {
            message: message.into(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TransferEventKind::Progress { .. } => "progress",
            TransferEventKind::Completed => "completed",
            TransferEventKind::Failed { .. } => "failed",
            TransferEventKind::Paused => "paused",
        }
    }
}
