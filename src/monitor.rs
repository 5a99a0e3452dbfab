//! Blocking event loop tying the joystick stream to the detector.

use std::io::Read;

use anyhow::{Context, Result};
use log::{debug, info, trace};

use crate::detector::CommandDetector;
use crate::joystick::{AxisMap, EventReader, JsEvent};

/// Details of a detected command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandMatch {
    /// History slot holding the final input.
    pub slot: usize,
    /// Time from the first to the last input of the command.
    pub span: u32,
    /// Device timestamp of the final input.
    pub timestamp: u32,
}

pub struct Monitor {
    detector: CommandDetector,
    axis_map: AxisMap,
}

impl Monitor {
    pub fn new(detector: CommandDetector, axis_map: AxisMap) -> Self {
        Self { detector, axis_map }
    }

    /// Feeds one raw event through classification and detection.
    pub fn process(&mut self, event: JsEvent) -> Option<CommandMatch> {
        let Some(code) = event.classify(&self.axis_map) else {
            trace!(
                "Ignored event type={:#04x} number={} value={}",
                event.kind, event.number, event.value
            );
            return None;
        };

        debug!("Input code {} at {}", code, event.time);

        if !self.detector.observe(code, event.time) {
            return None;
        }

        // observe() just wrote the newest slot, so it is always present.
        let slot = self.detector.history().last_slot()?;
        let command_match = CommandMatch {
            slot,
            span: self.detector.pattern().span_at(self.detector.history(), slot),
            timestamp: event.time,
        };
        info!(
            "Command detected at {} (span {})",
            command_match.timestamp, command_match.span
        );
        Some(command_match)
    }

    /// Reads events until the source fails, calling `on_match` for each
    /// detected command. Only returns on a read error or end of stream.
    pub fn run<R, F>(&mut self, reader: &mut EventReader<R>, mut on_match: F) -> Result<()>
    where
        R: Read,
        F: FnMut(&CommandMatch),
    {
        loop {
            let event = reader.next_event().context("error reading")?;
            if let Some(command_match) = self.process(event) {
                on_match(&command_match);
            }
        }
    }

    #[inline(always)]
    pub fn detector(&self) -> &CommandDetector {
        &self.detector
    }
}
