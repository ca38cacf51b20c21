//! Integration-level unit tests for the SettingsEngine public API.
//!
//! Exercises default loading, dot-path updates, persistence and reset.
//!
//! Requirements: 10.3 (board settings file)

use bookmark_board::services::settings_engine::{SettingsEngine, SettingsEngineTrait, SETTINGS_FILE};
use bookmark_board::types::errors::SettingsError;
use bookmark_board::types::settings::BoardSettings;
use serde_json::json;
use tempfile::TempDir;

/// Helper: a SettingsEngine backed by a temp directory the caller keeps alive.
fn engine_in_temp(dir: &TempDir) -> SettingsEngine {
    let path = dir.path().join(SETTINGS_FILE).to_string_lossy().to_string();
    SettingsEngine::new(Some(path))
}

/// With no file on disk the defaults are used.
#[test]
fn test_load_defaults_when_no_config_file_exists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    let settings = engine.load().unwrap();
    assert_eq!(settings, BoardSettings::default());
    assert_eq!(settings.storage.column_order_key, "bookmark_board_column_order");
    assert_eq!(settings.storage.bookmark_order_key, "bookmark_board_bookmark_order");
    assert!(settings.reconcile.refresh_on_remove);
    assert_eq!(settings.reconcile.fade_millis, 300);
}

/// `set_value` writes through to disk immediately.
#[test]
fn test_set_value_persists() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    engine.set_value("reconcile.refresh_on_remove", json!(false)).unwrap();

    let mut reloaded = engine_in_temp(&dir);
    assert!(!reloaded.load().unwrap().reconcile.refresh_on_remove);
}

#[test]
fn test_set_value_unknown_key_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    let err = engine.set_value("reconcile.nope", json!(true)).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidKey(_)));
    assert!(matches!(engine.set_value("", json!(1)), Err(SettingsError::InvalidKey(_))));
}

#[test]
fn test_set_value_wrong_type_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    let err = engine.set_value("reconcile.fade_millis", json!("slow")).unwrap_err();
    assert!(matches!(err, SettingsError::InvalidValue(_)));
    assert_eq!(engine.get_settings().reconcile.fade_millis, 300);
}

#[test]
fn test_reset_restores_defaults() {
    let dir = TempDir::new().unwrap();
    let mut engine = engine_in_temp(&dir);
    engine.load().unwrap();
    engine.set_value("storage.column_order_key", json!("custom")).unwrap();
    engine.reset().unwrap();
    assert_eq!(*engine.get_settings(), BoardSettings::default());
}

#[test]
fn test_load_malformed_json_fails() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join(SETTINGS_FILE), "{ invalid json }").unwrap();
    let mut engine = engine_in_temp(&dir);
    assert!(matches!(engine.load(), Err(SettingsError::SerializationError(_))));
}

#[test]
fn test_partial_file_fills_missing_sections() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join(SETTINGS_FILE),
        r#"{"reconcile":{"refresh_on_remove":false,"fade_millis":0,"detect_descendant_cycles":false}}"#,
    )
    .unwrap();
    let mut engine = engine_in_temp(&dir);
    let settings = engine.load().unwrap();
    assert_eq!(settings.storage, Default::default());
    assert!(!settings.reconcile.detect_descendant_cycles);
}
