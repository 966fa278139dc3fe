//! SQLite connection management for the download history.

use std::fs;
use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use super::migrations;

/// Owns the SQLite connection backing the history store.
///
/// Opening always brings the schema up to date, so every `Database` handed
/// out is ready for queries.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Opens (or creates) the database file at `path`, creating missing
    /// parent directories first.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && fs::create_dir_all(parent).is_err() {
                tracing::warn!(dir = %parent.display(), "could not create database directory");
            }
        }
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )?;
        Self::with_connection(conn)
    }

    /// Opens a throwaway in-memory database. Used by tests and the demo.
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, rusqlite::Error> {
        migrations::run_all(&conn)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
