//! Single-pattern detector owning its input history.

use crate::error::ConfigError;
use crate::history::EventHistory;
use crate::sequence_matcher::CommandPattern;

/// Records press-like inputs and checks the configured command after each one.
#[derive(Debug, Clone)]
pub struct CommandDetector {
    history: EventHistory,
    pattern: CommandPattern,
}

impl CommandDetector {
    /// Fails when the pattern is empty or cannot fit in `capacity - 1` slots.
    pub fn new(pattern: CommandPattern, capacity: usize) -> Result<Self, ConfigError> {
        if pattern.is_empty() {
            return Err(ConfigError::EmptyPattern);
        }
        let history = EventHistory::new(capacity)?;
        if pattern.len() > capacity - 1 {
            return Err(ConfigError::PatternTooLong {
                len: pattern.len(),
                capacity,
            });
        }

        Ok(Self { history, pattern })
    }

    /// Records an input and reports whether it completes the command.
    #[inline]
    pub fn observe(&mut self, code: u8, timestamp: u32) -> bool {
        let end = self.history.record(code, timestamp);
        self.pattern.matches(&self.history, end)
    }

    #[inline(always)]
    pub fn history(&self) -> &EventHistory {
        &self.history
    }

    #[inline(always)]
    pub fn pattern(&self) -> &CommandPattern {
        &self.pattern
    }

    /// Forgets every recorded input.
    pub fn reset(&mut self) {
        self.history.clear();
    }
}
