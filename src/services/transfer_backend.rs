//! Seam to the transfer backend.
//!
//! The backend owns the actual byte transfer and lives behind this trait.
//! Commands are request/response; progress and terminal notifications arrive
//! separately as [`TransferEvent`]s on a channel created with [`event_channel`].

use tokio::sync::mpsc;

use crate::types::errors::BackendError;
use crate::types::event::TransferEvent;
use crate::types::storage::StorageInfo;

/// Sending half of the push-event stream, held by the backend.
pub type EventSender = mpsc::UnboundedSender<TransferEvent>;
/// Receiving half of the push-event stream, owned by the session registry.
pub type EventReceiver = mpsc::UnboundedReceiver<TransferEvent>;

/// Creates the channel a backend publishes its events on.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

/// A request to start (or continue) one transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    pub url: String,
    pub destination_path: String,
    /// Validator from an earlier attempt, letting the backend continue a
    /// partial file instead of starting over.
    pub entity_tag: Option<String>,
}

/// Commands the session store issues to the transfer backend.
#[allow(async_fn_in_trait)]
pub trait TransferBackendTrait {
    /// Starts a transfer and returns its backend session id.
    async fn start_transfer(&self, request: &TransferRequest) -> Result<String, BackendError>;
    async fn pause_transfer(&self, session_id: &str) -> Result<(), BackendError>;
    async fn file_exists(&self, path: &str) -> Result<bool, BackendError>;
    async fn delete_file(&self, path: &str) -> Result<(), BackendError>;
    async fn query_storage(&self, path: &str) -> Result<StorageInfo, BackendError>;
}
