//! Configuration loading tests against real files on disk.

use argonaut_engine::config::Config;
use sdk::types::Variable;
use std::fs;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("config.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_full_config_from_path() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    let contents = format!(
        r#"
[core]
log_level = "debug"
data_dir = "{data}"

[interpreter]
equator_band_degrees = 10.0
default_variable = "temperature"
default_limit = 50
default_window_days = 7

[store]
db_path = "{data}/argo.db"
query_timeout_secs = 5
"#,
        data = data_dir.display()
    );
    let path = write_config(&dir, &contents);

    let config = Config::load_from_path(&path).unwrap();

    assert_eq!(config.core.log_level, "debug");
    assert_eq!(config.interpreter.equator_band_degrees, 10.0);
    assert_eq!(config.default_variable().unwrap(), Variable::Temperature);
    assert_eq!(config.interpreter.default_limit, 50);
    assert_eq!(config.store.query_timeout_secs, 5);

    // Validation creates the data directory as a side effect
    assert!(data_dir.exists());
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    let contents = format!(
        r#"
[core]
data_dir = "{data}"

[store]
db_path = "{data}/argo.db"
"#,
        data = data_dir.display()
    );
    let path = write_config(&dir, &contents);

    let config = Config::load_from_path(&path).unwrap();

    assert_eq!(config.core.log_level, "info");
    assert_eq!(config.interpreter.equator_band_degrees, 5.0);
    assert_eq!(config.default_variable().unwrap(), Variable::Salinity);
    assert_eq!(config.interpreter.default_limit, 200);
    assert_eq!(config.interpreter.default_window_days, 30);
}

#[test]
fn test_malformed_toml_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[core\nlog_level = ");

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(err.to_string().contains("parse"));
}

#[test]
fn test_unknown_default_variable_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[interpreter]
default_variable = "chlorophyll"
"#,
    );

    assert!(Config::load_from_path(&path).is_err());
}

#[test]
fn test_missing_file_is_a_config_error() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.toml");

    assert!(Config::load_from_path(&missing).is_err());
}
