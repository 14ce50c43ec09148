//! Time Source Abstraction for Embedded Systems
//!
//! The detector itself counts samples, not milliseconds. Clocks are only
//! needed around it: the acquisition loop of a device typically runs for a
//! fixed wall time and then stops, whatever the sample count.
//!
//! ## Common Implementations
//!
//! - `MonotonicTime`: std `Instant`, milliseconds since creation
//! - `FixedTime`: manually advanced, for deterministic tests

use crate::time::Timestamp;

/// Source of time for the system
///
/// ## Example Implementation
///
/// ```rust
/// use pantompkins_core::traits::TimeSource;
/// use pantompkins_core::time::Timestamp;
///
/// /// 32.768 kHz RTC prescaled to 1 kHz
/// struct RtcTicks {
///     ticks: u64,
/// }
///
/// impl TimeSource for RtcTicks {
///     fn now(&self) -> Timestamp {
///         self.ticks
///     }
///
///     fn is_wall_clock(&self) -> bool {
///         false
///     }
///
///     fn precision_ms(&self) -> u32 {
///         1
///     }
/// }
/// ```
///
/// ## Platform-Specific Considerations
///
/// ### Bare Metal (no_std)
/// - Use hardware timer peripherals directly
/// - Consider timer overflow and wraparound
///
/// ### Linux/Unix
/// - CLOCK_MONOTONIC for intervals
/// - CLOCK_REALTIME for wall clock
pub trait TimeSource {
    /// Get current timestamp in milliseconds
    ///
    /// The epoch depends on the implementation:
    /// - Monotonic sources: typically milliseconds since boot
    /// - Wall clock sources: milliseconds since Unix epoch
    /// - Test sources: arbitrary starting point
    fn now(&self) -> Timestamp;

    /// Check if this source provides wall clock time (vs monotonic)
    fn is_wall_clock(&self) -> bool;

    /// Get precision in milliseconds
    fn precision_ms(&self) -> u32;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }

    fn is_wall_clock(&self) -> bool {
        (**self).is_wall_clock()
    }

    fn precision_ms(&self) -> u32 {
        (**self).precision_ms()
    }
}
