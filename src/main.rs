use std::env;

use anyhow::{Context, Result};
use log::info;
use simplelog::{ColorChoice, TermLogger, TerminalMode};

use jschime::AppConfig;
use jschime::cli::{CliAction, USAGE, parse_args};

fn main() -> Result<()> {
    let (config_path, device_path) = match parse_args(env::args().skip(1)) {
        CliAction::Help => {
            println!("{}", USAGE);
            std::process::exit(1);
        }
        CliAction::Run {
            config_path,
            device_path,
        } => (config_path, device_path),
    };

    let config = AppConfig::load_or_create(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    TermLogger::init(
        config.log_level_filter(),
        simplelog::Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    )?;

    run(&config, &device_path)
}

#[cfg(target_os = "linux")]
fn run(config: &AppConfig, device_path: &str) -> Result<()> {
    use jschime::joystick::JoystickDevice;
    use jschime::monitor::Monitor;

    let device = JoystickDevice::open(device_path)
        .with_context(|| format!("jschime: cannot open {}", device_path))?;
    let device_info = device.info().clone();
    let axis_map = device_info.axis_map()?;
    let detector = config.build_detector(&axis_map)?;

    println!(
        "Joystick ({}) has {} axes and {} buttons. Driver version is {}.",
        device_info.name,
        device_info.axes,
        device_info.buttons,
        device_info.version_string()
    );
    info!(
        "Watching for {:?} within {} ms",
        detector.pattern().codes(),
        detector.pattern().max_interval()
    );
    println!("Testing ... (interrupt to exit)");

    let mut monitor = Monitor::new(detector, axis_map);
    let mut reader = device.into_reader();
    monitor.run(&mut reader, |_| println!("{}", config.message))
}

#[cfg(not(target_os = "linux"))]
fn run(_config: &AppConfig, device_path: &str) -> Result<()> {
    anyhow::bail!("jschime: joystick devices are only supported on Linux ({})", device_path)
}
