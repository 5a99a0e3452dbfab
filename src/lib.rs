//! Detects a fixed joystick input command, such as the classic
//! up-up-down-down sequence, inside a bounded time window.
//!
//! The detection core (`history`, `sequence_matcher`, `detector`) performs no
//! I/O; `joystick` and `monitor` connect it to a Linux joystick device.

pub mod cli;
pub mod command;
pub mod config;
pub mod detector;
pub mod error;
pub mod history;
pub mod joystick;
pub mod monitor;
pub mod sequence_matcher;

pub use config::AppConfig;
pub use detector::CommandDetector;
pub use error::ConfigError;
pub use history::EventHistory;
pub use sequence_matcher::{CommandPattern, detect};
