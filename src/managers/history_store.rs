//! History Persistence Adapter.
//!
//! Converts the session registry to and from its durable form and stores it
//! in SQLite via `rusqlite`. The adapter keeps no copy of its own: every
//! save writes the latest full snapshot (last writer wins).

use std::sync::Arc;

use rusqlite::params;

use crate::database::connection::Database;
use crate::types::download::{DownloadSession, DownloadStatus, HistoryRecord};
use crate::types::errors::PersistenceError;

/// Trait defining the history persistence contract.
pub trait HistoryStoreTrait {
    fn load_history(&self) -> Result<Vec<HistoryRecord>, PersistenceError>;
    fn save_history(&self, records: &[HistoryRecord]) -> Result<(), PersistenceError>;
    fn clear_history(&self) -> Result<(), PersistenceError>;
}

/// Strips volatile fields from a session.
pub fn to_record(session: &DownloadSession) -> HistoryRecord {
    HistoryRecord {
        id: session.id.clone(),
        source_url: session.source_url.clone(),
        destination_directory: session.destination_directory.clone(),
        filename: session.filename.clone(),
        total_bytes: session.total_bytes,
        downloaded_bytes: session.downloaded_bytes,
        status: session.status,
        error_detail: session.error_detail.clone(),
        entity_tag: session.entity_tag.clone(),
        created_at: session.created_at,
        updated_at: session.updated_at,
    }
}

pub fn to_records<'a, I>(sessions: I) -> Vec<HistoryRecord>
where
    I: IntoIterator<Item = &'a DownloadSession>,
{
    sessions.into_iter().map(to_record).collect()
}

/// Rebuilds a session from its record.
///
/// No backend transfer survives a restart, so a record saved while
/// `Downloading` comes back as `Paused`; otherwise it could never be
/// resumed or finished.
pub fn from_record(record: HistoryRecord) -> DownloadSession {
    let status = match record.status {
        DownloadStatus::Downloading => DownloadStatus::Paused,
        other => other,
    };
    DownloadSession {
        id: record.id,
        source_url: record.source_url,
        destination_directory: record.destination_directory,
        filename: record.filename,
        total_bytes: record.total_bytes,
        downloaded_bytes: record.downloaded_bytes,
        transfer_rate: 0,
        status,
        pause_requested: false,
        error_detail: record.error_detail,
        entity_tag: record.entity_tag,
        created_at: record.created_at,
        updated_at: record.updated_at,
    }
}

pub fn from_records(records: Vec<HistoryRecord>) -> Vec<DownloadSession> {
    records.into_iter().map(from_record).collect()
}

/// History store backed by the `download_history` table.
pub struct SqliteHistoryStore {
    db: Arc<Database>,
}

impl SqliteHistoryStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<HistoryRecord> {
        let status_str: String = row.get(6)?;
        let mut error_detail: Option<String> = row.get(7)?;
        let status = match DownloadStatus::parse(&status_str) {
            Some(status) => status,
            None => {
                error_detail = Some(format!("Unrecognized stored status: {}", status_str));
                DownloadStatus::Error
            }
        };
        Ok(HistoryRecord {
            id: row.get(0)?,
            source_url: row.get(1)?,
            destination_directory: row.get(2)?,
            filename: row.get(3)?,
            total_bytes: row.get::<_, Option<i64>>(4)?.map(|v| v as u64),
            downloaded_bytes: row.get::<_, i64>(5)? as u64,
            status,
            error_detail,
            entity_tag: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }
}

impl HistoryStoreTrait for SqliteHistoryStore {
    fn load_history(&self) -> Result<Vec<HistoryRecord>, PersistenceError> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare(
            "SELECT id, source_url, destination_directory, filename, total_bytes, downloaded_bytes,
                    status, error_detail, entity_tag, created_at, updated_at
             FROM download_history ORDER BY position ASC",
        )?;
        let records = stmt
            .query_map([], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    /// Replaces the stored history with `records` in one transaction.
    fn save_history(&self, records: &[HistoryRecord]) -> Result<(), PersistenceError> {
        let tx = self.db.connection().unchecked_transaction()?;
        tx.execute("DELETE FROM download_history", [])?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO download_history (id, position, source_url, destination_directory, filename,
                     total_bytes, downloaded_bytes, status, error_detail, entity_tag, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            )?;
            for (position, r) in records.iter().enumerate() {
                stmt.execute(params![
                    r.id,
                    position as i64,
                    r.source_url,
                    r.destination_directory,
                    r.filename,
                    r.total_bytes.map(|v| v as i64),
                    r.downloaded_bytes as i64,
                    r.status.as_str(),
                    r.error_detail,
                    r.entity_tag,
                    r.created_at,
                    r.updated_at,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn clear_history(&self) -> Result<(), PersistenceError> {
        self.db
            .connection()
            .execute("DELETE FROM download_history", [])?;
        Ok(())
    }
}
