//! Frame timer
//!
//! The host counts rendered frames; the simulation only ever sees the number
//! of frames elapsed since it last ran. Hosts that drop or coalesce frames
//! produce deltas larger than 1.

use thiserror::Error;

/// Rejected clock observations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("tick counter went backwards: {current} < {last}")]
    WentBackwards { last: u64, current: u64 },
}

/// Converts a monotonically increasing tick counter into per-update deltas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameTimer {
    last_tick: u64,
}

impl FrameTimer {
    /// Start observing from the given tick
    pub fn new(start_tick: u64) -> Self {
        Self { last_tick: start_tick }
    }

    /// Last tick the timer accepted
    pub fn last_tick(&self) -> u64 {
        self.last_tick
    }

    /// Record `current_tick` and return the frames elapsed since the last call.
    ///
    /// A counter that moves backwards is a host fault; the timer is left
    /// untouched so the next valid tick still measures from the last good one.
    pub fn advance(&mut self, current_tick: u64) -> Result<u32, ClockError> {
        if current_tick < self.last_tick {
            return Err(ClockError::WentBackwards {
                last: self.last_tick,
                current: current_tick,
            });
        }
        let delta = current_tick - self.last_tick;
        self.last_tick = current_tick;
        Ok(u32::try_from(delta).unwrap_or(u32::MAX))
    }
}
