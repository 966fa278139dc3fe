//! Event Reconciler.
//!
//! Applies backend push events to locally held sessions. The reducer is
//! pure: it takes a session and an event and returns the next session,
//! leaving timestamps, persistence and lookups to the registry.

use crate::types::download::{DownloadSession, DownloadStatus};
use crate::types::event::TransferEventKind;

/// Result of handing one event to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcileOutcome {
    /// The event referenced a registered session and was applied.
    Applied,
    /// No session is registered under the event's id; nothing changed.
    Ignored,
}

/// Returns `session` with `event` applied.
///
/// Every event is idempotent: applying it twice yields the same session as
/// applying it once.
pub fn apply_event(session: &DownloadSession, event: &TransferEventKind) -> DownloadSession {
    let mut next = session.clone();
    match event {
        TransferEventKind::Progress {
            downloaded,
            total,
            rate,
            entity_tag,
        } => {
            next.downloaded_bytes = *downloaded;
            next.total_bytes = *total;
            next.transfer_rate = *rate;
            if let Some(tag) = entity_tag {
                next.entity_tag = Some(tag.clone());
            }
            // Progress proves the backend is still transferring. It overrides
            // an optimistic pause but never a failure, a completion or a pause
            // the backend confirmed.
            let settled = match next.status {
                DownloadStatus::Error | DownloadStatus::Completed => true,
                DownloadStatus::Paused => !next.pause_requested,
                DownloadStatus::Pending | DownloadStatus::Downloading => false,
            };
            if !settled {
                next.status = DownloadStatus::Downloading;
                next.pause_requested = false;
            }
        }
        TransferEventKind::Completed => {
            next.status = DownloadStatus::Completed;
            next.transfer_rate = 0;
            next.pause_requested = false;
        }
        // A completed download is final: late failure or pause reports
        // only stop the rate.
        TransferEventKind::Failed { message } => {
            if next.status != DownloadStatus::Completed {
                next.status = DownloadStatus::Error;
                next.error_detail = Some(message.clone());
            }
            next.transfer_rate = 0;
            next.pause_requested = false;
        }
        TransferEventKind::Paused => {
            if next.status != DownloadStatus::Completed {
                next.status = DownloadStatus::Paused;
            }
            next.transfer_rate = 0;
            next.pause_requested = false;
        }
    }
    next
}

/// Whether applying `event` should trigger a storage capacity refresh.
pub fn refreshes_storage(event: &TransferEventKind) -> bool {
    matches!(event, TransferEventKind::Completed)
}
