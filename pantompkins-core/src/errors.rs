//! Error Types for the QRS Detection Pipeline
//!
//! ## Design Philosophy
//!
//! The detector runs on devices that may not have a heap, so errors follow the
//! same rules as the rest of the hot path:
//!
//! 1. **Small Size**: every variant fits in a few machine words; errors can be
//!    returned per sample without cost.
//!
//! 2. **No Heap Allocation**: reasons are `&'static str`, never `String`.
//!
//! 3. **Copy Semantics**: errors are `Copy` so the driver can log and forward
//!    them without moves.
//!
//! ## Error Categories
//!
//! ### Configuration
//! - `InvalidConfig`: a parameter can never work (zero rate, empty window)
//! - `BufferTooSmall`: the history capacity cannot hold the lookback the
//!   filters or the back-search need
//!
//! ### Numeric Range
//! - `Overflow`: a filter stage left the 64-bit range. The offending sample is
//!   rejected and the detector state is left exactly as it was.
//!
//! ### Lifecycle
//! - `Finished`: a sample was offered after the stream was flushed
//! - `OutputFull`: a fixed-capacity output sink ran out of room
//!
//! End of input is not an error: sources report it through
//! [`StreamError::EndOfStream`](crate::stream::StreamError::EndOfStream) and
//! the driver treats it as normal termination.
//!
//! ```rust
//! use pantompkins_core::{DetectorConfig, DetectorError, QrsDetector};
//!
//! match QrsDetector::<16>::new(DetectorConfig::default()) {
//!     Err(DetectorError::BufferTooSmall { required, available }) => {
//!         assert!(required > available);
//!     }
//!     _ => unreachable!("16 slots cannot hold 1.66 s at 250 Hz"),
//! }
//! ```

use core::fmt;

use thiserror_no_std::Error;

/// Result type for detector operations
pub type DetectorResult<T> = Result<T, DetectorError>;

/// Filter stage that produced a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// DC-blocking high-pass
    DcBlock,
    /// Integer low-pass
    LowPass,
    /// Integer high-pass
    HighPass,
    /// First difference
    Derivative,
    /// Squaring
    Squared,
    /// Moving-window integration
    Integral,
}

impl Stage {
    /// Short, stable name for logs
    pub const fn name(self) -> &'static str {
        match self {
            Self::DcBlock => "dc-block",
            Self::LowPass => "low-pass",
            Self::HighPass => "high-pass",
            Self::Derivative => "derivative",
            Self::Squared => "squared",
            Self::Integral => "integral",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Detector errors - kept small for embedded use
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorError {
    /// Configuration parameter can never produce a working detector
    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        /// Which constraint was violated
        reason: &'static str,
    },

    /// History capacity cannot hold the lookback the algorithm needs
    #[error("History buffer too small: need {required} samples, have {available}")]
    BufferTooSmall {
        /// Minimum capacity in samples
        required: usize,
        /// Capacity the detector was built with
        available: usize,
    },

    /// A filter value left the representable range
    #[error("Arithmetic overflow in {stage} stage")]
    Overflow {
        /// Stage whose output overflowed
        stage: Stage,
    },

    /// Sample offered after the stream was flushed
    #[error("Detector already finished")]
    Finished,

    /// Output sink cannot take another decision
    #[error("Output sink full after {capacity} decisions")]
    OutputFull {
        /// Decisions the sink holds
        capacity: usize,
    },
}

#[cfg(feature = "defmt")]
impl defmt::Format for Stage {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.name())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for DetectorError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::InvalidConfig { reason } =>
                defmt::write!(fmt, "Invalid config: {}", reason),
            Self::BufferTooSmall { required, available } =>
                defmt::write!(fmt, "Need {} history slots, have {}", required, available),
            Self::Overflow { stage } =>
                defmt::write!(fmt, "Overflow in {}", stage),
            Self::Finished =>
                defmt::write!(fmt, "Detector finished"),
            Self::OutputFull { capacity } =>
                defmt::write!(fmt, "Output full at {}", capacity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_names_stage() {
        let err = DetectorError::Overflow { stage: Stage::Squared };
        assert_eq!(format!("{}", err), "Arithmetic overflow in squared stage");
    }

    #[test]
    fn buffer_error_reports_sizes() {
        let err = DetectorError::BufferTooSmall { required: 415, available: 64 };
        assert_eq!(
            format!("{}", err),
            "History buffer too small: need 415 samples, have 64"
        );
    }
}
