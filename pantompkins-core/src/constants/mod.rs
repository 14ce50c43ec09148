//! Constants for the Pan-Tompkins detector
//!
//! Every numeric value the algorithm depends on is defined here with its
//! unit and purpose. None of them are tuned at runtime: changing one changes
//! the detector.
//!
//! ## Organization
//!
//! Constants are grouped by domain:
//! - **Timing**: refractory and T-wave windows, RR bound factors
//! - **Filters**: filter taps, lookbacks and smoothing weights
//! - **Buffers**: history and RR capacities, deployment defaults
//!
//! ## Usage Guidelines
//!
//! 1. Always use these constants instead of magic numbers
//! 2. Durations are in seconds; convert with the sample rate at one place
//! 3. Use descriptive names that include units

/// Refractory, T-wave and RR-interval timing.
pub mod timing;

/// Filter cascade taps and peak-estimate smoothing weights.
pub mod filters;

/// Buffer capacities and default deployment parameters.
pub mod buffers;

// Re-export commonly used constants for convenience
pub use timing::{
    REFRACTORY_PERIOD_S, T_WAVE_WINDOW_S,
    RR_LOW_FACTOR, RR_HIGH_FACTOR, RR_MISS_FACTOR,
};

pub use filters::{
    DC_BLOCK_POLE, HIGHPASS_LOOKBACK, SLOPE_LOOKBACK,
    PEAK_WEIGHT, BACKSEARCH_PEAK_WEIGHT, THRESHOLD_FRACTION,
};

pub use buffers::{
    RR_HISTORY_LEN, DEFAULT_HISTORY_SIZE,
    DEFAULT_SAMPLE_RATE_HZ, DEFAULT_WINDOW_SIZE, DEFAULT_OUTPUT_DELAY,
    NO_SAMPLE_SENTINEL,
};
