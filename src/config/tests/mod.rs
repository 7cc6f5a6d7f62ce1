//! Unit tests for config module
//!
//! Tests configuration types, defaults, overrides and validation.
//! No filesystem dependencies - all in-memory.

#![allow(clippy::panic)]

use std::path::{Path, PathBuf};

use crate::BridgeError;
use crate::config::{Config, LogLevel};

#[test]
fn config_default() {
    let config = Config::default();

    assert_eq!(config.general.log_level, LogLevel::Info);
    assert_eq!(config.serial.baud_rate, 9600);
    assert!(config.serial.device.is_none());
    assert!(config.media.ignored_players.is_empty());
    assert!((config.media.volume_step - 0.05).abs() < f64::EPSILON);
}

#[test]
fn config_serialize_toml() {
    let config = Config::default();

    let toml_str = toml::to_string(&config).unwrap();
    assert!(toml_str.contains("[general]"));
    assert!(toml_str.contains("[serial]"));
    assert!(toml_str.contains("[media]"));
}

#[test]
fn config_deserialize_toml() {
    let toml_str = r#"
        [general]
        log_level = "debug"

        [serial]
        device = "/dev/ttyACM0"
        baud_rate = 115200

        [media]
        ignored_players = ["chromium", "kdeconnect"]
        volume_step = 0.1
    "#;

    let config = Config::from_toml_str(toml_str).unwrap();

    assert_eq!(config.general.log_level, LogLevel::Debug);
    assert_eq!(config.serial.device.as_deref(), Some(Path::new("/dev/ttyACM0")));
    assert_eq!(config.serial.baud_rate, 115200);
    assert_eq!(config.media.ignored_players, vec!["chromium", "kdeconnect"]);
    assert!((config.media.volume_step - 0.1).abs() < f64::EPSILON);
}

#[test]
fn config_empty_toml() {
    let config = Config::from_toml_str("").unwrap();

    assert_eq!(config.serial.baud_rate, 9600);
    assert!(config.serial.device.is_none());
}

#[test]
fn config_partial_section_keeps_defaults() {
    let config = Config::from_toml_str("[serial]\ndevice = \"/dev/ttyUSB1\"\n").unwrap();

    assert_eq!(config.serial.baud_rate, 9600);
    assert!((config.media.volume_step - 0.05).abs() < f64::EPSILON);
}

#[test]
fn config_rejects_unknown_log_level() {
    let err = Config::from_toml_str("[general]\nlog_level = \"loud\"\n").unwrap_err();

    assert!(matches!(err, BridgeError::TomlParseError { .. }));
}

#[test]
fn missing_device_is_reported() {
    let config = Config::default();

    assert!(matches!(
        config.device_path(),
        Err(BridgeError::MissingDevicePath)
    ));
}

#[test]
fn env_device_overrides_file() {
    let mut config = Config::from_toml_str("[serial]\ndevice = \"/dev/from-file\"\n").unwrap();

    config.apply_overrides(Some("/dev/from-env".to_string()), None);

    assert_eq!(config.device_path().unwrap(), Path::new("/dev/from-env"));
}

#[test]
fn cli_device_overrides_env() {
    let mut config = Config::default();

    config.apply_overrides(
        Some("/dev/from-env".to_string()),
        Some(PathBuf::from("/dev/from-cli")),
    );

    assert_eq!(config.device_path().unwrap(), Path::new("/dev/from-cli"));
}

#[test]
fn empty_env_device_is_ignored() {
    let mut config = Config::default();

    config.apply_overrides(Some(String::new()), None);

    assert!(config.device_path().is_err());
}

#[test]
fn validate_rejects_non_positive_step() {
    let mut config = Config::default();
    config.media.volume_step = 0.0;

    let err = config.validate().unwrap_err();

    match err {
        BridgeError::InvalidConfigField { field, .. } => assert_eq!(field, "volume_step"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn validate_rejects_nan_step() {
    let mut config = Config::default();
    config.media.volume_step = f64::NAN;

    assert!(config.validate().is_err());
}

#[test]
fn validate_accepts_defaults() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn log_level_display() {
    assert_eq!(LogLevel::Warn.to_string(), "warn");
    assert_eq!(LogLevel::Trace.to_string(), "trace");
}
