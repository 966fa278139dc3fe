// Fetchdock shared type definitions
// Each submodule defines types used across the session store.

pub mod download;
pub mod errors;
pub mod event;
pub mod settings;
pub mod storage;
pub mod update;
