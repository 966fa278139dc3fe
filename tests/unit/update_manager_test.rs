//! Unit tests for the UpdateManager auto-update policy.

use std::cell::{Cell, RefCell};

use fetchdock::services::update_manager::{
    is_newer_version, verify_checksum, AutoUpdateOutcome, UpdateManager, UpdaterTrait,
};
use fetchdock::types::errors::UpdateError;
use fetchdock::types::settings::AppSettings;
use fetchdock::types::update::UpdateInfo;
use rstest::rstest;

#[derive(Default)]
struct FakeUpdater {
    available: Option<UpdateInfo>,
    fail_check: bool,
    fail_install: bool,
    checks: Cell<usize>,
    installed: RefCell<Vec<String>>,
}

impl UpdaterTrait for FakeUpdater {
    async fn check_for_update(&self) -> Result<Option<UpdateInfo>, UpdateError> {
        self.checks.set(self.checks.get() + 1);
        if self.fail_check {
            return Err(UpdateError::Network("connection refused".to_string()));
        }
        Ok(self.available.clone())
    }

    async fn install_update(&self, info: &UpdateInfo) -> Result<(), UpdateError> {
        if self.fail_install {
            return Err(UpdateError::ChecksumMismatch(info.sha256.clone()));
        }
        self.installed.borrow_mut().push(info.version.clone());
        Ok(())
    }
}

fn info() -> UpdateInfo {
    UpdateInfo {
        version: "9.0.0".to_string(),
        current_version: "0.3.0".to_string(),
        notes: "Faster resumes".to_string(),
        download_url: "https://updates.example/fetchdock-9.0.0".to_string(),
        sha256: "00".to_string(),
    }
}

fn settings(auto: bool, silent: bool) -> AppSettings {
    AppSettings {
        auto_update_enabled: auto,
        silent_updates: silent,
        ..AppSettings::default()
    }
}

fn manager(updater: FakeUpdater) -> UpdateManager<FakeUpdater> {
    UpdateManager::new(updater)
}

#[tokio::test]
async fn test_disabled_skips_check() {
    let m = manager(FakeUpdater {
        available: Some(info()),
        ..FakeUpdater::default()
    });
    let outcome = m.run_auto_update(&settings(false, true)).await.unwrap();
    assert_eq!(outcome, AutoUpdateOutcome::Disabled);
    assert_eq!(m.updater().checks.get(), 0);
}

#[tokio::test]
async fn test_up_to_date() {
    let m = manager(FakeUpdater::default());
    let outcome = m.run_auto_update(&settings(true, false)).await.unwrap();
    assert_eq!(outcome, AutoUpdateOutcome::UpToDate);
}

#[tokio::test]
async fn test_available_without_silent_updates() {
    let m = manager(FakeUpdater {
        available: Some(info()),
        ..FakeUpdater::default()
    });
    let outcome = m.run_auto_update(&settings(true, false)).await.unwrap();
    assert_eq!(outcome, AutoUpdateOutcome::Available(info()));
    assert!(m.updater().installed.borrow().is_empty());
}

#[tokio::test]
async fn test_silent_updates_install() {
    let m = manager(FakeUpdater {
        available: Some(info()),
        ..FakeUpdater::default()
    });
    let outcome = m.run_auto_update(&settings(true, true)).await.unwrap();
    assert_eq!(outcome, AutoUpdateOutcome::Installed(info()));
    assert_eq!(m.updater().installed.borrow().as_slice(), ["9.0.0".to_string()]);
}

#[tokio::test]
async fn test_failures_are_returned() {
    let m = manager(FakeUpdater {
        fail_check: true,
        ..FakeUpdater::default()
    });
    let err = m.run_auto_update(&settings(true, false)).await.unwrap_err();
    assert!(matches!(err, UpdateError::Network(_)));

    let m = manager(FakeUpdater {
        available: Some(info()),
        fail_install: true,
        ..FakeUpdater::default()
    });
    let err = m.run_auto_update(&settings(true, true)).await.unwrap_err();
    assert!(matches!(err, UpdateError::ChecksumMismatch(_)));
}

#[test]
fn test_current_version_is_package_version() {
    let m = manager(FakeUpdater::default());
    assert_eq!(m.get_current_version(), env!("CARGO_PKG_VERSION"));
}

#[rstest]
#[case("0.3.0", "0.3.1", true)]
#[case("0.3.0", "v1.0.0", true)]
#[case("0.3.0", "0.3.0", false)]
#[case("0.10.0", "0.9.9", false)]
#[case("1.2.3", "1.2.3-beta", false)]
fn test_version_comparison(#[case] current: &str, #[case] latest: &str, #[case] newer: bool) {
    assert_eq!(is_newer_version(current, latest), newer);
}

#[test]
fn test_checksum_of_empty_input() {
    let empty = "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";
    assert!(verify_checksum(b"", empty));
    assert!(verify_checksum(b"", &empty.to_uppercase()));
    assert!(!verify_checksum(b"x", empty));
}
