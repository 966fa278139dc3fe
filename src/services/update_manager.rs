//! Update Manager for fetchdock.
//!
//! Drives an external updater according to the user's update preferences.
//! The bundled [`ReleaseFeedUpdater`] reads a JSON release manifest over
//! HTTP and verifies downloaded installers with SHA-256.

use std::path::PathBuf;

use ring::digest;

use crate::platform;
use crate::types::errors::UpdateError;
use crate::types::settings::AppSettings;
use crate::types::update::{ReleaseManifest, UpdateInfo};

/// External updater contract.
#[allow(async_fn_in_trait)]
pub trait UpdaterTrait {
    async fn check_for_update(&self) -> Result<Option<UpdateInfo>, UpdateError>;
    /// Installs the update. On success the process is restarted and this
    /// call does not return normally.
    async fn install_update(&self, info: &UpdateInfo) -> Result<(), UpdateError>;
}

/// What an automatic update pass did.
#[derive(Debug, Clone, PartialEq)]
pub enum AutoUpdateOutcome {
    /// Automatic updates are turned off.
    Disabled,
    UpToDate,
    /// An update exists and the user should be asked before installing.
    Available(UpdateInfo),
    /// The update was handed to the installer.
    Installed(UpdateInfo),
}

/// Compares two dotted version strings. Returns true if `latest` is newer than `current`.
pub fn is_newer_version(current: &str, latest: &str) -> bool {
    let parse = |v: &str| -> Vec<u32> {
        v.trim()
            .trim_start_matches('v')
            .split(['.', '-', '+'])
            .map_while(|s| s.parse().ok())
            .collect()
    };
    parse(latest) > parse(current)
}

/// Checks `data` against a hex SHA-256 digest (case-insensitive).
pub fn verify_checksum(data: &[u8], expected_sha256: &str) -> bool {
    let actual = digest::digest(&digest::SHA256, data);
    let actual_hex: String = actual.as_ref().iter().map(|b| format!("{:02x}", b)).collect();
    actual_hex == expected_sha256.trim().to_lowercase()
}

/// Update manager applying the auto-update preferences.
pub struct UpdateManager<U> {
    updater: U,
    current_version: String,
}

impl<U: UpdaterTrait> UpdateManager<U> {
    pub fn new(updater: U) -> Self {
        Self {
            updater,
            current_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    pub fn get_current_version(&self) -> &str {
        &self.current_version
    }

    pub fn updater(&self) -> &U {
        &self.updater
    }

    pub async fn check(&self) -> Result<Option<UpdateInfo>, UpdateError> {
        self.updater.check_for_update().await
    }

    pub async fn install(&self, info: &UpdateInfo) -> Result<(), UpdateError> {
        tracing::info!(version = %info.version, "installing update");
        self.updater.install_update(info).await
    }

    /// One automatic update pass.
    ///
    /// Skipped when `auto_update_enabled` is off. With `silent_updates` an
    /// available update is installed right away; otherwise it is returned
    /// for the UI to offer.
    pub async fn run_auto_update(
        &self,
        settings: &AppSettings,
    ) -> Result<AutoUpdateOutcome, UpdateError> {
        if !settings.auto_update_enabled {
            return Ok(AutoUpdateOutcome::Disabled);
        }

        let info = match self.check().await {
            Ok(Some(info)) => info,
            Ok(None) => return Ok(AutoUpdateOutcome::UpToDate),
            Err(e) => {
                tracing::warn!(error = %e, "update check failed");
                return Err(e);
            }
        };

        if !settings.silent_updates {
            tracing::info!(version = %info.version, "update available");
            return Ok(AutoUpdateOutcome::Available(info));
        }

        self.install(&info).await.map_err(|e| {
            tracing::warn!(error = %e, "silent update failed");
            e
        })?;
        Ok(AutoUpdateOutcome::Installed(info))
    }
}

/// Updater reading a JSON release manifest (`version`, `notes`, `url`,
/// `sha256`) from a fixed URL.
pub struct ReleaseFeedUpdater {
    client: reqwest::Client,
    manifest_url: String,
    current_version: String,
    download_dir: PathBuf,
}

impl ReleaseFeedUpdater {
    pub fn new(manifest_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            manifest_url: manifest_url.into(),
            current_version: env!("CARGO_PKG_VERSION").to_string(),
            download_dir: platform::get_cache_dir().join("updates"),
        }
    }

    async fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, UpdateError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| UpdateError::Network(e.to_string()))?;
        let bytes = response
            .bytes()
            .await
            .map_err(|e| UpdateError::Network(e.to_string()))?;
        Ok(bytes.to_vec())
    }

    /// Turns a manifest into update info if it is newer than `current_version`.
    pub fn evaluate(&self, manifest: ReleaseManifest) -> Option<UpdateInfo> {
        if !is_newer_version(&self.current_version, &manifest.version) {
            return None;
        }
        Some(UpdateInfo {
            version: manifest.version,
            current_version: self.current_version.clone(),
            notes: manifest.notes,
            download_url: manifest.url,
            sha256: manifest.sha256,
        })
    }
}

impl UpdaterTrait for ReleaseFeedUpdater {
    async fn check_for_update(&self) -> Result<Option<UpdateInfo>, UpdateError> {
        let body = self.fetch_bytes(&self.manifest_url).await?;
        let manifest: ReleaseManifest =
            serde_json::from_slice(&body).map_err(|e| UpdateError::Parse(e.to_string()))?;
        Ok(self.evaluate(manifest))
    }

    async fn install_update(&self, info: &UpdateInfo) -> Result<(), UpdateError> {
        let data = self.fetch_bytes(&info.download_url).await?;
        if !verify_checksum(&data, &info.sha256) {
            return Err(UpdateError::ChecksumMismatch(format!(
                "installer for {} does not match its published digest",
                info.version
            )));
        }

        let file_name = info
            .download_url
            .rsplit('/')
            .next()
            .filter(|name| !name.is_empty())
            .unwrap_or("fetchdock-update");
        tokio::fs::create_dir_all(&self.download_dir)
            .await
            .map_err(|e| UpdateError::InstallFailed(e.to_string()))?;
        let installer = self.download_dir.join(file_name);
        tokio::fs::write(&installer, &data)
            .await
            .map_err(|e| UpdateError::InstallFailed(e.to_string()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tokio::fs::set_permissions(&installer, std::fs::Permissions::from_mode(0o755))
                .await
                .map_err(|e| UpdateError::InstallFailed(e.to_string()))?;
        }

        std::process::Command::new(&installer)
            .spawn()
            .map_err(|e| UpdateError::InstallFailed(e.to_string()))?;
        tracing::info!(installer = %installer.display(), "update installer launched, exiting");
        std::process::exit(0);
    }
}
