//! Property-based tests for AppSettings serialization round-trip.
//!
//! These tests verify that AppSettings can be serialized to JSON and
//! deserialized back, and saved and reloaded through the SettingsEngine,
//! without data loss for arbitrary valid inputs.

use fetchdock::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use fetchdock::types::settings::{AppSettings, ThemeMode};
use proptest::prelude::*;
use tempfile::TempDir;

fn arb_theme_mode() -> impl Strategy<Value = ThemeMode> {
    prop_oneof![
        Just(ThemeMode::Dark),
        Just(ThemeMode::Light),
        Just(ThemeMode::System),
    ]
}

fn arb_keybind() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("Ctrl"), Just("Alt"), Just("Ctrl+Shift"), Just("Cmd")],
        "[A-Z0-9]",
    )
        .prop_map(|(modifiers, key)| format!("{}+{}", modifiers, key))
}

fn arb_app_settings() -> impl Strategy<Value = AppSettings> {
    (
        proptest::option::of("/[a-zA-Z0-9 _-]{1,20}(/[a-zA-Z0-9 _-]{1,20}){0,3}"),
        arb_theme_mode(),
        any::<bool>(),
        arb_keybind(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(
                default_download_path,
                theme,
                launch_on_startup,
                toggle_keybind,
                auto_update_enabled,
                silent_updates,
            )| AppSettings {
                default_download_path,
                theme,
                launch_on_startup,
                toggle_keybind,
                auto_update_enabled,
                silent_updates,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn settings_json_roundtrip(settings in arb_app_settings()) {
        let json = serde_json::to_string(&settings).expect("serialize should succeed");
        let restored: AppSettings = serde_json::from_str(&json).expect("deserialize should succeed");
        prop_assert_eq!(restored, settings);
    }

    #[test]
    fn settings_survive_engine_reload(settings in arb_app_settings()) {
        let dir = TempDir::new().expect("temp dir");
        let path = dir.path().join("settings.json").to_string_lossy().to_string();

        let mut engine = SettingsEngine::new(Some(path.clone()));
        engine.replace(settings.clone()).expect("replace should save");

        let mut reloaded = SettingsEngine::new(Some(path));
        prop_assert_eq!(reloaded.load().expect("load should succeed"), settings);
    }
}
