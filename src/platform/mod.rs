// Fetchdock platform paths
// Config, data and cache directories per OS. Setting FETCHDOCK_HOME puts all
// three under one root (portable installs, tests).
//
// - Linux:   $XDG_CONFIG_HOME/fetchdock, $XDG_DATA_HOME/fetchdock, $XDG_CACHE_HOME/fetchdock
// - macOS:   ~/Library/Application Support/Fetchdock (config + data), ~/Library/Caches/Fetchdock
// - Windows: %APPDATA%/Fetchdock (config + data), %LOCALAPPDATA%/Fetchdock/cache

use std::env;
use std::path::{Path, PathBuf};

/// Environment variable overriding every platform directory.
pub const HOME_OVERRIDE_VAR: &str = "FETCHDOCK_HOME";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DirKind {
    Config,
    Data,
    Cache,
}

impl DirKind {
    fn name(self) -> &'static str {
        match self {
            DirKind::Config => "config",
            DirKind::Data => "data",
            DirKind::Cache => "cache",
        }
    }
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

/// Layout used when the override variable is set.
fn under_root(root: &Path, kind: DirKind) -> PathBuf {
    root.join(kind.name())
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn platform_dir(kind: DirKind) -> PathBuf {
    let home = env_path("HOME").unwrap_or_else(|| PathBuf::from("/tmp"));
    let (var, fallback) = match kind {
        DirKind::Config => ("XDG_CONFIG_HOME", home.join(".config")),
        DirKind::Data => ("XDG_DATA_HOME", home.join(".local").join("share")),
        DirKind::Cache => ("XDG_CACHE_HOME", home.join(".cache")),
    };
    env_path(var).unwrap_or(fallback).join("fetchdock")
}

#[cfg(target_os = "macos")]
fn platform_dir(kind: DirKind) -> PathBuf {
    let library = env_path("HOME")
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("Library");
    match kind {
        DirKind::Config | DirKind::Data => library.join("Application Support").join("Fetchdock"),
        DirKind::Cache => library.join("Caches").join("Fetchdock"),
    }
}

#[cfg(target_os = "windows")]
fn platform_dir(kind: DirKind) -> PathBuf {
    match kind {
        DirKind::Config | DirKind::Data => env_path("APPDATA")
            .unwrap_or_else(|| PathBuf::from("C:\\Users\\Default\\AppData\\Roaming"))
            .join("Fetchdock"),
        DirKind::Cache => env_path("LOCALAPPDATA")
            .unwrap_or_else(|| PathBuf::from("C:\\Users\\Default\\AppData\\Local"))
            .join("Fetchdock")
            .join("cache"),
    }
}

fn resolve(kind: DirKind) -> PathBuf {
    match env_path(HOME_OVERRIDE_VAR) {
        Some(root) => under_root(&root, kind),
        None => platform_dir(kind),
    }
}

/// Directory holding `settings.json`.
pub fn get_config_dir() -> PathBuf {
    resolve(DirKind::Config)
}

/// Directory holding the history database and log files.
pub fn get_data_dir() -> PathBuf {
    resolve(DirKind::Data)
}

/// Directory for downloaded update installers.
pub fn get_cache_dir() -> PathBuf {
    resolve(DirKind::Cache)
}
