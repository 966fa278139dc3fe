//! App Core for fetchdock.
//!
//! Holds the session registry, settings and updater, and runs the startup
//! and shutdown sequences.

use std::sync::Arc;

use crate::database::connection::Database;
use crate::managers::history_store::{HistoryStoreTrait, SqliteHistoryStore};
use crate::managers::session_registry::SessionRegistry;
use crate::platform;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use crate::services::transfer_backend::{EventReceiver, TransferBackendTrait};
use crate::services::update_manager::{AutoUpdateOutcome, UpdateManager, UpdaterTrait};
use crate::types::errors::{SettingsError, UpdateError};

/// Central application struct.
pub struct App<B, H, U> {
    pub registry: SessionRegistry<B, H>,
    pub settings_engine: SettingsEngine,
    pub update_manager: UpdateManager<U>,
}

impl<B, U> App<B, SqliteHistoryStore, U>
where
    B: TransferBackendTrait,
    U: UpdaterTrait,
{
    /// Opens the history database in the platform data dir and builds the app
    /// with default settings location.
    pub fn open(backend: B, events: EventReceiver, updater: U) -> Result<Self, rusqlite::Error> {
        let db_path = platform::get_data_dir().join("history.db");
        let db = Arc::new(Database::open(db_path)?);
        Ok(Self::new(
            SessionRegistry::with_events(backend, SqliteHistoryStore::new(db), events),
            SettingsEngine::new(None),
            UpdateManager::new(updater),
        ))
    }
}

impl<B, H, U> App<B, H, U>
where
    B: TransferBackendTrait,
    H: HistoryStoreTrait,
    U: UpdaterTrait,
{
    pub fn new(
        registry: SessionRegistry<B, H>,
        settings_engine: SettingsEngine,
        update_manager: UpdateManager<U>,
    ) -> Self {
        Self {
            registry,
            settings_engine,
            update_manager,
        }
    }

    /// Startup sequence: load settings, select the default folder, restore
    /// history, refresh storage info.
    pub async fn startup(&mut self) {
        if let Err(e) = self.settings_engine.load() {
            tracing::warn!(error = %e, "failed to load settings, using defaults");
        }

        let default_dir = self.settings_engine.get_settings().default_download_path.clone();
        self.registry.set_download_dir(default_dir);
        self.registry.restore_history();
        self.registry.refresh_storage().await;
    }

    /// Changes the default download folder, persists it, and makes it the
    /// registry's selected folder.
    pub async fn set_default_download_path(&mut self, dir: &str) -> Result<(), SettingsError> {
        let mut settings = self.settings_engine.get_settings().clone();
        settings.default_download_path = Some(dir.to_string());
        self.settings_engine.replace(settings)?;

        self.registry.set_download_dir(Some(dir.to_string()));
        self.registry.refresh_storage().await;
        Ok(())
    }

    /// Runs one automatic update pass with the current settings.
    pub async fn auto_update(&self) -> Result<AutoUpdateOutcome, UpdateError> {
        self.update_manager
            .run_auto_update(self.settings_engine.get_settings())
            .await
    }

    /// Shutdown sequence: stop listening to backend events.
    pub fn shutdown(&mut self) {
        self.registry.shutdown();
        tracing::info!("fetchdock core shut down");
    }
}
