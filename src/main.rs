//! Fetchdock console demo.
//!
//! Drives the session store against an in-process simulated backend: starts
//! downloads, feeds progress, pauses, resumes, and restores the history from
//! a fresh app instance as if the process had restarted. Pass `--log-file` to
//! write logs under the data dir instead of stderr.

use std::cell::RefCell;
use std::path::PathBuf;

use fetchdock::app::App;
use fetchdock::managers::filename_resolver::generate_candidate;
use fetchdock::managers::history_store::SqliteHistoryStore;
use fetchdock::managers::session_registry::{SessionRegistry, SessionRegistryTrait};
use fetchdock::platform;
use fetchdock::services::local_disk;
use fetchdock::services::settings_engine::SettingsEngineTrait;
use fetchdock::services::transfer_backend::{
    event_channel, EventSender, TransferBackendTrait, TransferRequest,
};
use fetchdock::services::update_manager::ReleaseFeedUpdater;
use fetchdock::types::errors::BackendError;
use fetchdock::types::event::{TransferEvent, TransferEventKind};
use fetchdock::types::storage::StorageInfo;
use uuid::Uuid;

/// Backend that accepts every transfer and reports half of it done.
struct SimulatedBackend {
    events: EventSender,
    started: RefCell<Vec<TransferRequest>>,
}

impl SimulatedBackend {
    fn new(events: EventSender) -> Self {
        Self {
            events,
            started: RefCell::new(Vec::new()),
        }
    }

    fn emit(&self, id: &str, kind: TransferEventKind) {
        let _ = self.events.send(TransferEvent::new(id, kind));
    }
}

impl TransferBackendTrait for SimulatedBackend {
    async fn start_transfer(&self, request: &TransferRequest) -> Result<String, BackendError> {
        if !request.url.starts_with("http") {
            return Err(BackendError::Rejected(format!("unsupported url {}", request.url)));
        }
        let id = Uuid::new_v4().to_string();
        self.started.borrow_mut().push(request.clone());
        self.emit(
            &id,
            TransferEventKind::Progress {
                downloaded: 512,
                total: Some(1024),
                rate: 256,
                entity_tag: Some(format!("\"{}\"", &id[..8])),
            },
        );
        Ok(id)
    }

    async fn pause_transfer(&self, session_id: &str) -> Result<(), BackendError> {
        self.emit(session_id, TransferEventKind::Paused);
        Ok(())
    }

    async fn file_exists(&self, path: &str) -> Result<bool, BackendError> {
        local_disk::file_exists(path).await
    }

    async fn delete_file(&self, path: &str) -> Result<(), BackendError> {
        local_disk::delete_file(path).await
    }

    async fn query_storage(&self, path: &str) -> Result<StorageInfo, BackendError> {
        local_disk::query_storage(path).await
    }
}

fn section(name: &str) {
    println!("───────────────────────────────────────────────────────────────");
    println!("  {}", name);
    println!("───────────────────────────────────────────────────────────────");
}

const MANIFEST_URL: &str = "http://localhost/fetchdock/latest.json";

type DemoApp = App<SimulatedBackend, SqliteHistoryStore, ReleaseFeedUpdater>;

fn open_app() -> DemoApp {
    let (tx, rx) = event_channel();
    App::open(SimulatedBackend::new(tx), rx, ReleaseFeedUpdater::new(MANIFEST_URL))
        .expect("Failed to open history database")
}

fn print_sessions(registry: &SessionRegistry<SimulatedBackend, SqliteHistoryStore>) {
    for s in registry.list() {
        println!(
            "  [{:<11}] {} -> {}  {}/{}  rate {}  id {}",
            s.status.as_str(),
            s.source_url,
            s.filename,
            s.downloaded_bytes,
            s.total_bytes.map(|t| t.to_string()).unwrap_or_else(|| "?".to_string()),
            s.transfer_rate,
            &s.id[..8.min(s.id.len())]
        );
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let workdir: PathBuf = std::env::temp_dir().join(format!("fetchdock-demo-{}", Uuid::new_v4()));
    std::env::set_var(platform::HOME_OVERRIDE_VAR, &workdir);

    if std::env::args().any(|a| a == "--log-file") {
        fetchdock::logging::init(&fetchdock::logging::default_log_dir())
            .expect("Failed to set up file logging");
    } else {
        fetchdock::logging::init_stderr();
    }

    println!();
    println!("  Fetchdock v{} (demo mode)", env!("CARGO_PKG_VERSION"));
    println!();

    let downloads = workdir.join("downloads");
    std::fs::create_dir_all(&downloads).expect("Failed to create downloads directory");
    let downloads_str = downloads.to_string_lossy().to_string();

    section("Settings");
    let mut app = open_app();
    app.startup().await;
    app.set_default_download_path(&downloads_str)
        .await
        .expect("Failed to store download path");
    let settings = app.settings_engine.get_settings();
    println!("  Default folder: {:?}", settings.default_download_path);
    println!("  Toggle shortcut: {}", settings.toggle_keybind);
    println!("  Auto update: {}", settings.auto_update_enabled);
    println!("  Running version: {}", app.update_manager.get_current_version());
    println!();

    section("Start downloads");
    let registry = &mut app.registry;
    std::fs::write(downloads.join("report.pdf"), b"existing").expect("Failed to seed file");
    let report = registry
        .start_download("https://example.com/report.pdf", "report.pdf")
        .await
        .expect("start failed");
    let archive = registry
        .start_download("https://example.com/archive", "archive")
        .await
        .expect("start failed");
    println!("  report.pdf existed, stored as {}", registry.get(&report).map(|s| s.filename.as_str()).unwrap_or("?"));
    println!("  next candidate for 'archive' would be {}", generate_candidate("archive", 1));
    if let Err(e) = registry.start_download("ftp://example.com/x", "x").await {
        println!("  Rejected as expected: {}", e);
    }
    println!("  Backend accepted {} transfers", registry.backend().started.borrow().len());
    let applied = registry.pump_events().await;
    println!("  Applied {} progress events", applied);
    print_sessions(registry);
    if let Some(info) = registry.storage_info() {
        println!("  Disk {}: {} bytes free", info.mount_point, info.free);
    }
    println!();

    section("Pause / resume");
    registry.pause(&archive).await.expect("pause failed");
    registry.pump_events().await;
    let resumed = registry.resume(&archive).await.expect("resume failed");
    println!("  archive re-keyed {} -> {}", &archive[..8], &resumed[..8]);
    registry.pause(&report).await.expect("pause failed");
    registry.pump_events().await;
    registry
        .handle_event(TransferEvent::new(resumed.clone(), TransferEventKind::Completed))
        .await;
    print_sessions(registry);
    println!();

    section("Restart");
    app.shutdown();
    drop(app);
    let mut app = open_app();
    app.startup().await;
    println!("  Restored {} sessions", app.registry.len());
    print_sessions(&app.registry);
    app.registry.clear_all().await;
    println!("  Cleared, {} sessions left", app.registry.len());
    app.shutdown();
    println!();

    let _ = std::fs::remove_dir_all(&workdir);
    println!("  Demo finished.");
}
