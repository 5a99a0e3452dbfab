//! Command-line argument handling.

pub const DEFAULT_CONFIG_PATH: &str = "jschime.toml";
pub const USAGE: &str = "Usage: jschime [--config <file>] <device>";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliAction {
    /// Print usage and exit.
    Help,
    Run {
        config_path: String,
        device_path: String,
    },
}

/// Parses arguments (without the program name). `-h`/`--help` anywhere wins.
pub fn parse_args<I>(args: I) -> CliAction
where
    I: IntoIterator<Item = String>,
{
    let mut config_path = DEFAULT_CONFIG_PATH.to_string();
    let mut device_path = None;
    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--help" | "-h" => return CliAction::Help,
            "--config" | "-c" => match iter.next() {
                Some(path) => config_path = path,
                None => return CliAction::Help,
            },
            _ => device_path = Some(arg),
        }
    }

    match device_path {
        Some(device_path) => CliAction::Run {
            config_path,
            device_path,
        },
        None => CliAction::Help,
    }
}
