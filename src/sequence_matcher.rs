//! Command detection over the circular input history.

use crate::history::EventHistory;
use smallvec::SmallVec;

/// Commands up to this length are stored inline.
const INLINE_COMMAND_LENGTH: usize = 16;
/// Per-input time budget used by the classic joystick command, in ms.
pub const DEFAULT_STEP_INTERVAL: u32 = 500;

/// Immutable target sequence plus the maximum allowed span.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandPattern {
    codes: SmallVec<[u8; INLINE_COMMAND_LENGTH]>,
    max_interval: u32,
}

impl CommandPattern {
    #[inline]
    pub fn new(codes: &[u8], max_interval: u32) -> Self {
        Self {
            codes: SmallVec::from_slice(codes),
            max_interval,
        }
    }

    /// Builds a pattern whose window budget is `step_interval` per input.
    #[inline]
    pub fn with_step_budget(codes: &[u8], step_interval: u32) -> Self {
        let steps = u32::try_from(codes.len()).unwrap_or(u32::MAX);
        Self::new(codes, step_interval.saturating_mul(steps))
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    #[inline(always)]
    pub fn codes(&self) -> &[u8] {
        &self.codes
    }

    #[inline(always)]
    pub fn max_interval(&self) -> u32 {
        self.max_interval
    }

    /// Whether the window ending at slot `end` matches this pattern.
    #[inline]
    pub fn matches(&self, history: &EventHistory, end: usize) -> bool {
        detect(history, end, &self.codes, self.max_interval)
    }

    /// Time between the first and last event of the window ending at `end`.
    #[inline]
    pub fn span_at(&self, history: &EventHistory, end: usize) -> u32 {
        window_span(history, end, self.codes.len())
    }
}

/// Tests whether the `pattern.len()` events ending at slot `end` equal
/// `pattern` and span at most `max_interval` time units.
///
/// Returns false when the window would reach back past the oldest recorded
/// event, so zeroed slots of a cold history can never complete a match, and
/// when it would run past the newest event into overwritten slots. The span is
/// measured with wrapping arithmetic, which stays correct across a device
/// clock rollover as long as the real span is below `u32::MAX`.
pub fn detect(history: &EventHistory, end: usize, pattern: &[u8], max_interval: u32) -> bool {
    let len = pattern.len();
    let capacity = history.capacity();
    if len == 0 || len >= capacity || history.recorded() < len as u64 {
        return false;
    }

    let Some(newest) = history.last_slot() else {
        return false;
    };
    let end = end % capacity;
    // How many events are newer than `end`.
    let age = (newest + capacity - end) % capacity;
    if age + len > capacity || (age + len) as u64 > history.recorded() {
        return false;
    }

    let start = window_start(end, len, capacity);
    let codes = history.codes();

    let content_matches = if start <= end {
        codes[start..=end] == *pattern
    } else {
        // Window straddles the buffer boundary: older part sits at the tail.
        let (older, newer) = pattern.split_at(capacity - start);
        codes[start..] == *older && codes[..=end] == *newer
    };

    content_matches && window_span(history, end, len) <= max_interval
}

#[inline(always)]
fn window_start(end: usize, len: usize, capacity: usize) -> usize {
    (end + capacity + 1 - len) % capacity
}

#[inline]
fn window_span(history: &EventHistory, end: usize, len: usize) -> u32 {
    let capacity = history.capacity();
    if len == 0 || len > capacity {
        return 0;
    }
    let (_, first) = history.at(window_start(end % capacity, len, capacity));
    let (_, last) = history.at(end);
    last.wrapping_sub(first)
}
