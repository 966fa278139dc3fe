use serde::{Deserialize, Serialize};

/// Process-wide user preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    /// Folder new downloads go to. `None` until the user picks one.
    pub default_download_path: Option<String>,
    pub theme: ThemeMode,
    pub launch_on_startup: bool,
    /// Global shortcut that shows or hides the main window.
    pub toggle_keybind: String,
    pub auto_update_enabled: bool,
    pub silent_updates: bool,
}

pub const DEFAULT_TOGGLE_KEYBIND: &str = "Ctrl+Shift+D";

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            default_download_path: None,
            theme: ThemeMode::System,
            launch_on_startup: false,
            toggle_keybind: DEFAULT_TOGGLE_KEYBIND.to_string(),
            auto_update_enabled: true,
            silent_updates: false,
        }
    }
}

/// Theme mode selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ThemeMode {
    Dark,
    Light,
    System,
}
