//! Clocks for run timers
//!
//! Provides the time sources used around the detector:
//! - Monotonic clock (for run timers on a workstation)
//! - Fixed clock (for deterministic tests)

use core::cell::Cell;

pub use crate::traits::TimeSource;

/// Timestamp in milliseconds since epoch (or device boot for monotonic)
pub type Timestamp = u64;

/// Monotonic time source backed by `std::time::Instant`
///
/// Starts at 0 when created and always increases.
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct MonotonicTime {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicTime {
    /// Clock reading 0 now
    pub fn new() -> Self {
        Self {
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicTime {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for MonotonicTime {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_millis() as Timestamp
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

/// Fixed time source for testing
///
/// Advanced by hand through a shared reference, so a test can keep moving
/// the clock while an adapter borrows it.
///
/// ```rust
/// use pantompkins_core::time::{FixedTime, TimeSource};
///
/// let clock = FixedTime::new(0);
/// let borrowed = &clock;
/// clock.advance(250);
/// assert_eq!(borrowed.now(), 250);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FixedTime {
    timestamp: Cell<Timestamp>,
}

impl FixedTime {
    /// Clock stopped at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self {
            timestamp: Cell::new(timestamp),
        }
    }

    /// Jump to `timestamp`
    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.set(timestamp);
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.timestamp.set(self.timestamp.get().saturating_add(ms));
    }
}

impl TimeSource for FixedTime {
    fn now(&self) -> Timestamp {
        self.timestamp.get()
    }

    fn is_wall_clock(&self) -> bool {
        false
    }

    fn precision_ms(&self) -> u32 {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_time_advances() {
        let time = FixedTime::new(1000);
        assert_eq!(time.now(), 1000);

        time.advance(500);
        assert_eq!(time.now(), 1500);

        time.set(10);
        assert_eq!(time.now(), 10);
    }

    #[test]
    fn fixed_time_saturates() {
        let time = FixedTime::new(u64::MAX - 1);
        time.advance(10);
        assert_eq!(time.now(), u64::MAX);
    }

    #[cfg(feature = "std")]
    #[test]
    fn monotonic_time_never_decreases() {
        let clock = MonotonicTime::new();
        let first = clock.now();
        let second = clock.now();
        assert!(second >= first);
        assert!(!clock.is_wall_clock());
    }
}
