//! Versioned schema for the fetchdock database.
//!
//! Applied versions are listed in `schema_version`. Each pending step runs in
//! its own transaction together with the row that records it, so a failed
//! step leaves the schema at the previous version.

use rusqlite::{params, Connection, OptionalExtension};

type Step = fn(&Connection) -> Result<(), rusqlite::Error>;

/// Ordered schema steps: version, description, body.
const STEPS: &[(i32, &str, Step)] = &[(1, "Download history table", create_download_history)];

/// Latest schema version this build knows about.
pub const CURRENT_SCHEMA_VERSION: i32 = 1;

/// Highest applied version, or 0 for a fresh database.
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT MAX(version) FROM schema_version", [], |row| {
        row.get::<_, Option<i32>>(0)
    })
    .optional()
    .ok()
    .flatten()
    .flatten()
    .unwrap_or(0)
}

/// Brings the schema up to [`CURRENT_SCHEMA_VERSION`]. Safe to call on every open.
pub fn run_all(conn: &Connection) -> Result<(), rusqlite::Error> {
    let mode: String =
        conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
    tracing::trace!(journal_mode = %mode, "journal mode set");

    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
             version INTEGER PRIMARY KEY,
             applied_at INTEGER NOT NULL,
             description TEXT NOT NULL
         );",
    )?;

    let applied = get_schema_version(conn);
    for (version, description, step) in STEPS.iter().filter(|(v, _, _)| *v > applied) {
        let tx = conn.unchecked_transaction()?;
        step(&tx)?;
        tx.execute(
            "INSERT INTO schema_version (version, applied_at, description) VALUES (?1, strftime('%s', 'now'), ?2)",
            params![version, description],
        )?;
        tx.commit()?;
        tracing::info!(version, description, "applied schema migration");
    }
    Ok(())
}

/// The persisted download list. `position` keeps the registry's list order.
fn create_download_history(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS download_history (
            id TEXT PRIMARY KEY,
            position INTEGER NOT NULL,
            source_url TEXT NOT NULL,
            destination_directory TEXT NOT NULL,
            filename TEXT NOT NULL,
            total_bytes INTEGER,
            downloaded_bytes INTEGER NOT NULL DEFAULT 0,
            status TEXT NOT NULL,
            error_detail TEXT,
            entity_tag TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_download_history_position ON download_history(position);
        ",
    )
}
