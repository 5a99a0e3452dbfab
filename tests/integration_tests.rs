//! Integration tests for jschime.
//!
//! Tests drive the configuration, joystick decoding and detection layers
//! together through their public interfaces.

use jschime::config::AppConfig;
use jschime::joystick::{AxisMap, EventReader, JS_EVENT_AXIS, JS_EVENT_BUTTON, JsEvent};
use jschime::monitor::{CommandMatch, Monitor};
use log::LevelFilter;
use std::fs;
use std::io::Cursor;
use std::path::PathBuf;

const KONAMI: [u8; 10] = [10, 10, 11, 11, 8, 9, 8, 9, 2, 3];

/// Returns a unique temporary file path for test isolation.
fn get_test_file_path(name: &str) -> PathBuf {
    let mut path = std::env::temp_dir();
    path.push(format!(
        "jschime_integration_test_{}_{}.toml",
        name,
        std::process::id()
    ));
    path
}

/// Removes a test file if it exists.
fn cleanup_test_file(path: &PathBuf) {
    let _ = fs::remove_file(path);
}

/// A 4-axis, 8-button pad, so axis 0 maps to codes 8/9 and axis 1 to 10/11.
fn gamepad_map() -> AxisMap {
    AxisMap::new(4, 8).expect("valid axis map")
}

/// Encodes the event stream a pad would produce when entering `codes`,
/// including releases and stick returns between presses.
fn encode_presses(codes: &[u8], step: u32) -> Vec<u8> {
    let mut bytes = Vec::new();
    for (i, &code) in codes.iter().enumerate() {
        let time = i as u32 * step;
        let (kind, number, value) = if code < 8 {
            (JS_EVENT_BUTTON, code, 1)
        } else {
            let axis = (code - 8) / 2;
            let value = if code % 2 == 0 { -32767 } else { 32767 };
            (JS_EVENT_AXIS, axis, value)
        };
        let press = JsEvent {
            time,
            value,
            kind,
            number,
        };
        let release = JsEvent {
            time: time + 1,
            value: 0,
            ..press
        };
        bytes.extend_from_slice(&press.to_bytes());
        bytes.extend_from_slice(&release.to_bytes());
    }
    bytes
}

fn run_stream(config: &AppConfig, bytes: Vec<u8>) -> Vec<CommandMatch> {
    let map = gamepad_map();
    let detector = config.build_detector(&map).expect("valid detector");
    let mut monitor = Monitor::new(detector, map);
    let mut reader = EventReader::new(Cursor::new(bytes));
    let mut matches = Vec::new();

    let result = monitor.run(&mut reader, |m| matches.push(*m));
    assert!(result.is_err(), "Stream end is reported as a read error");

    matches
}

/// Tests configuration save and load cycle preserves data.
#[test]
fn test_config_round_trip() {
    let path = get_test_file_path("round_trip");

    let mut config = AppConfig::default();
    config.command = "B1,AXIS2+,7".to_string();
    config.step_interval = 250;
    config.history_capacity = 32;
    config.message = "HADOUKEN".to_string();
    config.log_level = "debug".to_string();

    config.save_to_file(&path).expect("Failed to save config");
    let loaded = AppConfig::load_from_file(&path).expect("Failed to load config");

    assert_eq!(loaded.command, config.command);
    assert_eq!(loaded.step_interval, 250);
    assert_eq!(loaded.history_capacity, 32);
    assert_eq!(loaded.message, "HADOUKEN");
    assert_eq!(loaded.log_level_filter(), LevelFilter::Debug);

    cleanup_test_file(&path);
}

/// Tests that quotes and backslashes in string settings survive a save and load.
#[test]
fn test_config_round_trip_escapes_strings() {
    let path = get_test_file_path("escaped_strings");

    let mut config = AppConfig::default();
    config.message = r#"Say "CONAMI" \o/"#.to_string();
    config.command = "B1,\"B2".to_string();

    config.save_to_file(&path).expect("Failed to save config");
    let loaded = AppConfig::load_from_file(&path).expect("Failed to load config");

    assert_eq!(loaded.message, config.message);
    assert_eq!(loaded.command, config.command);

    cleanup_test_file(&path);
}

/// Tests that a missing config file is created with defaults.
#[test]
fn test_config_load_or_create() {
    let path = get_test_file_path("load_or_create");
    cleanup_test_file(&path);

    let created = AppConfig::load_or_create(&path).expect("Failed to create config");
    assert!(path.exists());

    let reloaded = AppConfig::load_or_create(&path).expect("Failed to reload config");
    assert_eq!(reloaded.command, created.command);
    assert_eq!(reloaded.message, "CONAMI");

    cleanup_test_file(&path);
}

/// Tests that missing fields use defaults and out-of-range values are corrected.
#[test]
fn test_config_defaults_and_validation() {
    let path = get_test_file_path("validation");

    let content = r#"
        step_interval = 0
        log_level = "loud"
    "#;
    fs::write(&path, content).expect("Failed to write test config");

    let config = AppConfig::load_from_file(&path).expect("Failed to load config");

    assert_eq!(config.step_interval, 1);
    assert_eq!(config.history_capacity, 64);
    assert_eq!(config.log_level_filter(), LevelFilter::Info);

    cleanup_test_file(&path);
}

/// Tests that the default command resolves to the classic code sequence.
#[test]
fn test_default_command_codes() {
    let detector = AppConfig::default()
        .build_detector(&gamepad_map())
        .expect("valid detector");

    assert_eq!(detector.pattern().codes(), KONAMI);
    assert_eq!(detector.pattern().max_interval(), 5000);
}

/// Tests that an oversized command is rejected before monitoring starts.
#[test]
fn test_command_longer_than_history_rejected() {
    let mut config = AppConfig::default();
    config.history_capacity = 10;
    assert!(config.build_detector(&gamepad_map()).is_err());

    config.history_capacity = 11;
    assert!(config.build_detector(&gamepad_map()).is_ok());
}

/// Tests that commands naming inputs the device lacks are rejected.
#[test]
fn test_command_for_missing_inputs_rejected() {
    let mut config = AppConfig::default();
    config.command = "B9,UP".to_string();
    assert!(config.build_detector(&gamepad_map()).is_err());

    config.command = "AXIS4+".to_string();
    assert!(config.build_detector(&gamepad_map()).is_err());
}

/// Tests the full pipeline: a quick entry fires once on the final press.
#[test]
fn test_stream_quick_entry_matches() {
    let matches = run_stream(&AppConfig::default(), encode_presses(&KONAMI, 100));

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].span, 900);
    assert_eq!(matches[0].timestamp, 900);
    assert_eq!(matches[0].slot, 9);
}

/// Tests that an entry slower than the window never fires.
#[test]
fn test_stream_slow_entry_ignored() {
    let matches = run_stream(&AppConfig::default(), encode_presses(&KONAMI, 1000));

    assert!(matches.is_empty());
}

/// Tests that a wrong final input never fires.
#[test]
fn test_stream_wrong_final_input_ignored() {
    let mut codes = KONAMI;
    codes[9] = 4;

    let matches = run_stream(&AppConfig::default(), encode_presses(&codes, 100));

    assert!(matches.is_empty());
}

/// Tests detection after long play, when the command wraps the history.
#[test]
fn test_stream_matches_across_history_boundary() {
    let mut codes: Vec<u8> = (0..60).map(|i| (i % 8) as u8).collect();
    codes.extend_from_slice(&KONAMI);

    let matches = run_stream(&AppConfig::default(), encode_presses(&codes, 100));

    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].slot, (69 % 64) as usize);
    assert_eq!(matches[0].span, 900);
}
