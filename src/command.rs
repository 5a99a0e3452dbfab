//! Textual command notation, e.g. `"UP,UP,DOWN,DOWN,LEFT,RIGHT,LEFT,RIGHT,B2,B3"`.

use crate::joystick::AxisMap;

/// One entry of a command before it is bound to a concrete device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandInput {
    /// Raw code, used as-is
    Code(u8),
    Button(u8),
    Axis { axis: u8, positive: bool },
}

impl CommandInput {
    /// Translates the entry into a code of the device described by `map`.
    pub fn resolve(&self, map: &AxisMap) -> Result<u8, String> {
        match *self {
            CommandInput::Code(code) => Ok(code),
            CommandInput::Button(button) if button < map.buttons() => Ok(button),
            CommandInput::Button(button) => Err(format!(
                "Button {} not available (device has {} buttons)",
                button,
                map.buttons()
            )),
            CommandInput::Axis { axis, positive } => map
                .code_for(axis, if positive { 1 } else { -1 })
                .ok_or_else(|| {
                    format!("Axis {} not available (device has {} axes)", axis, map.axes())
                }),
        }
    }
}

impl std::fmt::Display for CommandInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandInput::Code(code) => write!(f, "{}", code),
            CommandInput::Button(button) => write!(f, "B{}", button),
            CommandInput::Axis { axis, positive } => {
                write!(f, "AXIS{}{}", axis, if *positive { '+' } else { '-' })
            }
        }
    }
}

pub fn parse_command_string(s: &str) -> Result<Vec<CommandInput>, String> {
    if s.trim().is_empty() {
        return Err("Command cannot be empty".to_string());
    }

    s.split(',').map(|p| parse_command_input(p.trim())).collect()
}

/// Resolves every entry against `map`.
pub fn resolve_command(inputs: &[CommandInput], map: &AxisMap) -> Result<Vec<u8>, String> {
    inputs.iter().map(|input| input.resolve(map)).collect()
}

fn parse_command_input(s: &str) -> Result<CommandInput, String> {
    if s.is_empty() {
        return Err("Empty input in command".to_string());
    }

    let upper = s.to_uppercase();

    // Hat and left stick on most pads
    match upper.as_str() {
        "UP" | "↑" => return Ok(axis(1, false)),
        "DOWN" | "↓" => return Ok(axis(1, true)),
        "LEFT" | "←" => return Ok(axis(0, false)),
        "RIGHT" | "→" => return Ok(axis(0, true)),
        _ => {}
    }

    if let Some(rest) = upper.strip_prefix("AXIS") {
        let (number, positive) = match rest.chars().last() {
            Some('+') => (&rest[..rest.len() - 1], true),
            Some('-') => (&rest[..rest.len() - 1], false),
            _ => return Err(format!("Axis input needs a + or - direction: {}", s)),
        };
        return parse_number(number, s).map(|axis_number| axis(axis_number, positive));
    }

    if let Some(number) = upper
        .strip_prefix("BTN")
        .or_else(|| upper.strip_prefix('B'))
    {
        return parse_number(number, s).map(CommandInput::Button);
    }

    upper
        .parse::<u8>()
        .map(CommandInput::Code)
        .map_err(|_| format!("Unknown input: {}", s))
}

#[inline]
fn axis(axis: u8, positive: bool) -> CommandInput {
    CommandInput::Axis { axis, positive }
}

fn parse_number(number: &str, input: &str) -> Result<u8, String> {
    number
        .parse::<u8>()
        .map_err(|_| format!("Invalid index in input: {}", input))
}
