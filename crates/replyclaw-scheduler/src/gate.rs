//! Daily time-window gate.

use chrono::Timelike;

/// Local-hour window `[start, end)` during which scheduled runs may fire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start_hour: u32,
    pub end_hour: u32,
}

impl TimeWindow {
    pub const fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// Whether a run may start at the given local time.
    pub fn contains<T: Timelike>(&self, now: &T) -> bool {
        let hour = now.hour();
        self.start_hour <= hour && hour < self.end_hour
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::new(9, 22)
    }
}
