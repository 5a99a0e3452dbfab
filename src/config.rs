use anyhow::Context;
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::command::{parse_command_string, resolve_command};
use crate::detector::CommandDetector;
use crate::joystick::AxisMap;
use crate::sequence_matcher::{CommandPattern, DEFAULT_STEP_INTERVAL};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default = "default_command")]
    pub command: String,
    #[serde(default = "default_step_interval")]
    pub step_interval: u32,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
    #[serde(default = "default_message")]
    pub message: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_command() -> String {
    "UP,UP,DOWN,DOWN,LEFT,RIGHT,LEFT,RIGHT,B2,B3".to_string()
}
fn default_step_interval() -> u32 {
    DEFAULT_STEP_INTERVAL
}
fn default_history_capacity() -> usize {
    64
}
fn default_message() -> String {
    "CONAMI".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

/// Quotes and escapes `s` as a TOML string value.
fn toml_string(s: &str) -> String {
    toml::Value::String(s.to_string()).to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            command: default_command(),
            step_interval: default_step_interval(),
            history_capacity: default_history_capacity(),
            message: default_message(),
            log_level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Load config from file, or create default if not exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        if !path.as_ref().exists() {
            let default_config = Self::default();
            default_config.save_to_file(&path)?;
            return Ok(default_config);
        }
        Self::load_from_file(path)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.as_ref().display()))?;
        let mut config: AppConfig = toml::from_str(&content)?;

        if config.step_interval < 1 {
            config.step_interval = 1;
        }

        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let commented = format!(
            "# Comma separated inputs: raw codes (10), buttons (B2 or BTN2),\n\
             # axis directions (AXIS0- / AXIS0+) or UP, DOWN, LEFT, RIGHT\n\
             command = {}\n\
             step_interval = {}          # Time budget per input (ms of device clock)\n\
             history_capacity = {}        # Number of remembered inputs, must exceed the command length\n\
             message = {}          # Printed when the command is entered\n\
             log_level = {}          # off, error, warn, info, debug or trace\n",
            toml_string(&self.command),
            self.step_interval,
            self.history_capacity,
            toml_string(&self.message),
            toml_string(&self.log_level)
        );

        fs::write(path, commented)?;
        Ok(())
    }

    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// Binds the command to the device's input codes and builds its detector.
    pub fn build_detector(&self, axis_map: &AxisMap) -> anyhow::Result<CommandDetector> {
        let inputs = parse_command_string(&self.command).map_err(anyhow::Error::msg)?;
        let codes = resolve_command(&inputs, axis_map).map_err(anyhow::Error::msg)?;
        let pattern = CommandPattern::with_step_budget(&codes, self.step_interval);

        CommandDetector::new(pattern, self.history_capacity)
            .context("Invalid command configuration")
    }
}
