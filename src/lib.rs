//! Fetchdock: session store for a desktop download manager.
//!
//! Keeps the list of download sessions, reconciles it against the transfer
//! backend's push events, persists it as download history, and handles the
//! pause/resume and filename collision protocols.

pub mod app;
pub mod database;
pub mod logging;
pub mod managers;
pub mod platform;
pub mod services;
pub mod types;
