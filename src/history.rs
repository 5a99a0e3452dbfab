//! Fixed-capacity circular history of recorded inputs.

use crate::error::ConfigError;

/// Ring buffer of `(code, timestamp)` pairs.
///
/// Codes and timestamps live in parallel arrays; slot `i` of both always
/// describes the same event. The oldest entry is overwritten once full.
#[derive(Debug, Clone)]
pub struct EventHistory {
    codes: Box<[u8]>,
    timestamps: Box<[u32]>,
    cursor: usize,
    recorded: u64,
    /// `capacity - 1` when capacity is a power of two.
    mask: Option<usize>,
}

impl EventHistory {
    pub fn new(capacity: usize) -> Result<Self, ConfigError> {
        if capacity == 0 {
            return Err(ConfigError::ZeroCapacity);
        }

        Ok(Self {
            codes: vec![0; capacity].into_boxed_slice(),
            timestamps: vec![0; capacity].into_boxed_slice(),
            cursor: 0,
            recorded: 0,
            mask: capacity.is_power_of_two().then_some(capacity - 1),
        })
    }

    /// Writes an event at the cursor and returns the slot it landed in.
    #[inline]
    pub fn record(&mut self, code: u8, timestamp: u32) -> usize {
        let slot = self.cursor;
        self.codes[slot] = code;
        self.timestamps[slot] = timestamp;
        self.cursor = self.wrap(slot + 1);
        self.recorded = self.recorded.saturating_add(1);
        slot
    }

    /// Looks up the event stored at `index`, taken modulo capacity.
    #[inline(always)]
    pub fn at(&self, index: usize) -> (u8, u32) {
        let slot = self.wrap(index);
        (self.codes[slot], self.timestamps[slot])
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.codes.len()
    }

    /// Next slot to be written.
    #[inline(always)]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of events recorded since creation or the last [`clear`](Self::clear).
    #[inline(always)]
    pub fn recorded(&self) -> u64 {
        self.recorded
    }

    /// Slot holding the most recent event, if any.
    #[inline]
    pub fn last_slot(&self) -> Option<usize> {
        if self.recorded == 0 {
            return None;
        }
        Some(self.wrap(self.cursor + self.capacity() - 1))
    }

    pub fn clear(&mut self) {
        self.codes.fill(0);
        self.timestamps.fill(0);
        self.cursor = 0;
        self.recorded = 0;
    }

    #[inline(always)]
    pub(crate) fn codes(&self) -> &[u8] {
        &self.codes
    }

    #[inline(always)]
    fn wrap(&self, index: usize) -> usize {
        match self.mask {
            Some(mask) => index & mask,
            None => index % self.codes.len(),
        }
    }
}
