//! Session Registry for fetchdock.
//!
//! The single owner of all download sessions in the process. User intents
//! (create, pause, resume, remove, clear) go through here to the transfer
//! backend; backend push events come back through [`SessionRegistryTrait::handle_event`].
//! Every mutation writes a fresh history snapshot.
//!
//! The registry is driven from one task. Methods take `&mut self`, so the
//! only interleaving points are the awaits on backend replies, and no event
//! can be applied while an intent is in flight.

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::managers::filename_resolver::{join_destination, resolve_filename};
use crate::managers::history_store::{from_records, to_records, HistoryStoreTrait};
use crate::managers::reconciler::{apply_event, refreshes_storage, ReconcileOutcome};
use crate::services::transfer_backend::{EventReceiver, TransferBackendTrait, TransferRequest};
use crate::types::download::{DownloadSession, DownloadStatus};
use crate::types::errors::SessionError;
use crate::types::event::TransferEvent;
use crate::types::storage::StorageInfo;

/// Trait defining session registry operations.
#[allow(async_fn_in_trait)]
pub trait SessionRegistryTrait {
    async fn create_session(
        &mut self,
        url: &str,
        destination_dir: &str,
        filename: &str,
    ) -> Result<String, SessionError>;
    async fn start_download(&mut self, url: &str, filename: &str) -> Result<String, SessionError>;
    async fn pause(&mut self, id: &str) -> Result<(), SessionError>;
    async fn resume(&mut self, id: &str) -> Result<String, SessionError>;
    async fn remove(&mut self, id: &str, delete_file: bool) -> Result<(), SessionError>;
    async fn clear_all(&mut self);
    async fn handle_event(&mut self, event: TransferEvent) -> ReconcileOutcome;
    fn get(&self, id: &str) -> Option<&DownloadSession>;
    fn list(&self) -> Vec<&DownloadSession>;
    fn active(&self) -> Vec<&DownloadSession>;
}

/// In-memory session registry keyed by current backend id.
pub struct SessionRegistry<B, H> {
    backend: B,
    history: H,
    sessions: HashMap<String, DownloadSession>,
    /// Ids in list order. A resumed session keeps its slot under the new id.
    order: Vec<String>,
    download_dir: Option<String>,
    storage_info: Option<StorageInfo>,
    events: Option<EventReceiver>,
}

impl<B: TransferBackendTrait, H: HistoryStoreTrait> SessionRegistry<B, H> {
    pub fn new(backend: B, history: H) -> Self {
        Self {
            backend,
            history,
            sessions: HashMap::new(),
            order: Vec::new(),
            download_dir: None,
            storage_info: None,
            events: None,
        }
    }

    /// Creates a registry already listening on the backend's event stream.
    pub fn with_events(backend: B, history: H, events: EventReceiver) -> Self {
        let mut registry = Self::new(backend, history);
        registry.subscribe(events);
        registry
    }

    fn now_ts() -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as i64
    }

    // --- Event subscription ---

    /// Installs the receiver backend events are read from, replacing any
    /// previous subscription.
    pub fn subscribe(&mut self, events: EventReceiver) {
        self.events = Some(events);
    }

    /// Drops the event subscription. Events still queued are discarded.
    pub fn shutdown(&mut self) {
        if let Some(mut rx) = self.events.take() {
            rx.close();
            tracing::debug!("event subscription closed");
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.events.is_some()
    }

    /// Applies every event currently queued without waiting for more.
    /// Returns the number of events that matched a session.
    pub async fn pump_events(&mut self) -> usize {
        let mut applied = 0;
        while let Some(event) = self.events.as_mut().and_then(|rx| rx.try_recv().ok()) {
            if self.handle_event(event).await == ReconcileOutcome::Applied {
                applied += 1;
            }
        }
        applied
    }

    /// Waits for the next event and applies it.
    ///
    /// Returns `false` once the stream has closed (the subscription is then
    /// dropped) or when there is no subscription.
    pub async fn next_event(&mut self) -> bool {
        let received = match self.events.as_mut() {
            Some(rx) => rx.recv().await,
            None => return false,
        };
        match received {
            Some(event) => {
                self.handle_event(event).await;
                true
            }
            None => {
                tracing::info!("backend event stream closed");
                self.events = None;
                false
            }
        }
    }

    // --- History ---

    /// Replaces the registry contents with the persisted history.
    ///
    /// A load failure is logged and leaves the registry empty.
    pub fn restore_history(&mut self) -> usize {
        let records = match self.history.load_history() {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(error = %e, "failed to load download history");
                Vec::new()
            }
        };
        self.sessions.clear();
        self.order.clear();
        for session in from_records(records) {
            if self.sessions.contains_key(&session.id) {
                tracing::warn!(id = %session.id, "duplicate id in download history, skipping");
                continue;
            }
            self.order.push(session.id.clone());
            self.sessions.insert(session.id.clone(), session);
        }
        tracing::info!(count = self.order.len(), "restored download history");
        self.order.len()
    }

    /// Writes the full registry snapshot. Failures are logged, never returned.
    fn persist(&self) {
        let snapshot = to_records(self.order.iter().filter_map(|id| self.sessions.get(id)));
        if let Err(e) = self.history.save_history(&snapshot) {
            tracing::warn!(error = %e, "failed to save download history");
        }
    }

    // --- Destination folder & storage ---

    pub fn set_download_dir(&mut self, dir: Option<String>) {
        self.download_dir = dir.filter(|d| !d.trim().is_empty());
        self.storage_info = None;
    }

    pub fn download_dir(&self) -> Option<&str> {
        self.download_dir.as_deref()
    }

    pub fn storage_info(&self) -> Option<&StorageInfo> {
        self.storage_info.as_ref()
    }

    /// Re-queries capacity of the selected folder's disk. Best-effort.
    pub async fn refresh_storage(&mut self) {
        let Some(dir) = self.download_dir.clone() else {
            return;
        };
        match self.backend.query_storage(&dir).await {
            Ok(info) => self.storage_info = Some(info),
            Err(e) => tracing::warn!(dir = %dir, error = %e, "storage query failed"),
        }
    }

    // --- Accessors ---

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    fn require(&self, id: &str) -> Result<&DownloadSession, SessionError> {
        self.sessions
            .get(id)
            .ok_or_else(|| SessionError::NotFound(id.to_string()))
    }
}

impl<B: TransferBackendTrait, H: HistoryStoreTrait> SessionRegistryTrait for SessionRegistry<B, H> {
    /// Starts a new download into `destination_dir/filename`.
    ///
    /// Nothing is registered unless the backend accepts the transfer.
    async fn create_session(
        &mut self,
        url: &str,
        destination_dir: &str,
        filename: &str,
    ) -> Result<String, SessionError> {
        if destination_dir.trim().is_empty() {
            return Err(SessionError::Configuration);
        }

        let request = TransferRequest {
            url: url.to_string(),
            destination_path: join_destination(destination_dir, filename),
            entity_tag: None,
        };
        let id = self.backend.start_transfer(&request).await.map_err(|e| {
            tracing::warn!(url, error = %e, "backend refused to start download");
            SessionError::Backend(e)
        })?;

        let now = Self::now_ts();
        let session = DownloadSession {
            id: id.clone(),
            source_url: url.to_string(),
            destination_directory: destination_dir.to_string(),
            filename: filename.to_string(),
            total_bytes: None,
            downloaded_bytes: 0,
            transfer_rate: 0,
            status: DownloadStatus::Downloading,
            pause_requested: false,
            error_detail: None,
            entity_tag: None,
            created_at: now,
            updated_at: now,
        };

        if self.sessions.insert(id.clone(), session).is_some() {
            tracing::warn!(id = %id, "backend reused a live session id");
        } else {
            self.order.push(id.clone());
        }
        self.persist();
        tracing::info!(id = %id, url, filename, "download started");
        Ok(id)
    }

    /// Starts a download into the selected folder, renaming the file if
    /// one with the same name already exists there.
    async fn start_download(&mut self, url: &str, filename: &str) -> Result<String, SessionError> {
        let dir = self
            .download_dir
            .clone()
            .ok_or(SessionError::Configuration)?;
        let filename = resolve_filename(&self.backend, &dir, filename).await?;
        self.create_session(url, &dir, &filename).await
    }

    /// Pauses a downloading session.
    ///
    /// The session moves to `Paused` whatever the backend answers; the
    /// backend's own `paused` event later confirms it. A backend failure is
    /// still returned so the caller can report it.
    async fn pause(&mut self, id: &str) -> Result<(), SessionError> {
        let status = self.require(id)?.status;
        if status != DownloadStatus::Downloading {
            return Err(SessionError::InvalidState {
                id: id.to_string(),
                status,
                action: "pause",
            });
        }

        let result = self.backend.pause_transfer(id).await;

        if let Some(session) = self.sessions.get_mut(id) {
            session.status = DownloadStatus::Paused;
            session.pause_requested = true;
            session.transfer_rate = 0;
            session.updated_at = Self::now_ts();
        }
        self.persist();

        match result {
            Ok(()) => {
                tracing::info!(id, "download paused");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "backend pause failed, marked paused anyway");
                Err(SessionError::Backend(e))
            }
        }
    }

    /// Restarts a paused or failed session as a new backend transfer.
    ///
    /// On success the session is re-keyed under the new id in one step and
    /// the new id is returned. On failure it stays under its old id in
    /// `Error` with the new failure message.
    async fn resume(&mut self, id: &str) -> Result<String, SessionError> {
        let session = self.require(id)?;
        if !session.status.is_resumable() {
            return Err(SessionError::InvalidState {
                id: id.to_string(),
                status: session.status,
                action: "resume",
            });
        }

        let request = TransferRequest {
            url: session.source_url.clone(),
            destination_path: session.destination_path(),
            entity_tag: session.entity_tag.clone(),
        };

        match self.backend.start_transfer(&request).await {
            Ok(new_id) => {
                let Some(mut session) = self.sessions.remove(id) else {
                    return Err(SessionError::NotFound(id.to_string()));
                };
                session.id = new_id.clone();
                session.status = DownloadStatus::Downloading;
                session.pause_requested = false;
                session.error_detail = None;
                session.transfer_rate = 0;
                session.updated_at = Self::now_ts();

                if let Some(slot) = self.order.iter_mut().find(|slot| slot.as_str() == id) {
                    *slot = new_id.clone();
                }
                if self.sessions.insert(new_id.clone(), session).is_some() {
                    tracing::warn!(id = %new_id, "resume replaced a session with the same id");
                    self.order.retain(|slot| slot != &new_id);
                    self.order.push(new_id.clone());
                }
                self.persist();
                tracing::info!(old_id = id, new_id = %new_id, "download resumed");
                Ok(new_id)
            }
            Err(e) => {
                if let Some(session) = self.sessions.get_mut(id) {
                    session.status = DownloadStatus::Error;
                    session.pause_requested = false;
                    session.error_detail = Some(e.to_string());
                    session.transfer_rate = 0;
                    session.updated_at = Self::now_ts();
                }
                self.persist();
                tracing::warn!(id, error = %e, "resume failed");
                Err(SessionError::Backend(e))
            }
        }
    }

    /// Removes a session, optionally deleting its file.
    ///
    /// Pausing a live transfer and deleting the file are both best-effort;
    /// the session is removed from the list either way.
    async fn remove(&mut self, id: &str, delete_file: bool) -> Result<(), SessionError> {
        let session = self.require(id)?;
        let was_downloading = session.status == DownloadStatus::Downloading;
        let path = session.destination_path();

        if was_downloading {
            if let Err(e) = self.backend.pause_transfer(id).await {
                tracing::warn!(id, error = %e, "pause before remove failed");
            }
        }
        if delete_file {
            if let Err(e) = self.backend.delete_file(&path).await {
                tracing::warn!(id, path = %path, error = %e, "failed to delete downloaded file");
            }
        }

        self.sessions.remove(id);
        self.order.retain(|slot| slot != id);
        self.persist();
        tracing::info!(id, delete_file, "download removed");
        Ok(())
    }

    /// Pauses every live transfer (best-effort), empties the registry and
    /// clears the stored history.
    async fn clear_all(&mut self) {
        let live: Vec<String> = self
            .order
            .iter()
            .filter(|id| {
                self.sessions
                    .get(*id)
                    .is_some_and(|s| s.status == DownloadStatus::Downloading)
            })
            .cloned()
            .collect();
        for id in &live {
            if let Err(e) = self.backend.pause_transfer(id).await {
                tracing::warn!(id = %id, error = %e, "pause during clear failed");
            }
        }

        self.sessions.clear();
        self.order.clear();
        if let Err(e) = self.history.clear_history() {
            tracing::warn!(error = %e, "failed to clear download history");
        }
        tracing::info!(paused = live.len(), "download list cleared");
    }

    /// Applies one backend event.
    ///
    /// Events for ids that are not registered (removed, or replaced by a
    /// resume) are ignored. A repeated event leaves the session untouched
    /// and writes nothing.
    async fn handle_event(&mut self, event: TransferEvent) -> ReconcileOutcome {
        let Some(current) = self.sessions.get(&event.session_id) else {
            tracing::debug!(
                id = %event.session_id,
                kind = event.kind.name(),
                "ignoring event for unknown session"
            );
            return ReconcileOutcome::Ignored;
        };

        let mut next = apply_event(current, &event.kind);
        if next != *current {
            next.updated_at = Self::now_ts();
            tracing::debug!(
                id = %event.session_id,
                kind = event.kind.name(),
                status = %next.status,
                "applied backend event"
            );
            self.sessions.insert(event.session_id.clone(), next);
            self.persist();
        }

        if refreshes_storage(&event.kind) {
            self.refresh_storage().await;
        }
        ReconcileOutcome::Applied
    }

    fn get(&self, id: &str) -> Option<&DownloadSession> {
        self.sessions.get(id)
    }

    fn list(&self) -> Vec<&DownloadSession> {
        self.order
            .iter()
            .filter_map(|id| self.sessions.get(id))
            .collect()
    }

    fn active(&self) -> Vec<&DownloadSession> {
        self.list()
            .into_iter()
            .filter(|s| s.status == DownloadStatus::Downloading)
            .collect()
    }
}
