//! Streaming Pan-Tompkins QRS detection
//!
//! Turns a fixed-rate, single-channel ECG into one beat/no-beat decision per
//! sample. Designed for edge devices with limited resources.
//!
//! Key constraints:
//! - Fixed memory: every buffer is sized at compile time
//! - No heap allocation in the per-sample path
//! - Bounded work per sample (one filter step, at most one history scan)
//!
//! ```no_run
//! use pantompkins_core::{DetectorConfig, QrsDetector};
//!
//! let mut detector = QrsDetector::<600>::new(DetectorConfig::default())?;
//! let mut beats: Vec<bool> = Vec::new();
//!
//! for sample in [926, 920, 916, 911, 902, 896] {
//!     detector.process(sample, &mut beats)?;
//! }
//! detector.finish(&mut beats)?;
//! # Ok::<(), pantompkins_core::DetectorError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[macro_use]
mod logging;

pub mod backsearch;
pub mod buffer;
pub mod config;
pub mod constants;
pub mod detector;
pub mod errors;
pub mod filters;
pub mod history;
pub mod pipeline;
pub mod rr;
pub mod stream;
pub mod thresholds;
pub mod time;
pub mod traits;

// Public API
pub use config::DetectorConfig;
pub use detector::{BeatEvent, BeatKind, DefaultDetector, QrsDetector};
pub use errors::{DetectorError, DetectorResult, Stage};
pub use pipeline::{detect_into, run, Decision, FnSink, OutputSink, RunError, RunSummary, StopSignal};

#[cfg(feature = "alloc")]
pub use pipeline::{detect, detect_with};

/// Sample amplitude as delivered by the acquisition front end
pub type Sample = i32;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
