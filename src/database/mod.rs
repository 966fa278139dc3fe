//! SQLite storage for fetchdock.
//!
//! [`Database`] owns one connection and migrates the schema when opened;
//! [`crate::managers::history_store::SqliteHistoryStore`] is its only user.
//!
//! ```no_run
//! use std::sync::Arc;
//! use fetchdock::database::Database;
//! use fetchdock::managers::history_store::SqliteHistoryStore;
//!
//! let db = Arc::new(Database::open("history.db").expect("failed to open database"));
//! let store = SqliteHistoryStore::new(db);
//! ```

pub mod connection;
pub mod migrations;

pub use connection::Database;
