//! Buffer Sizes and Deployment Defaults
//!
//! Capacities are fixed at compile time; the defaults match a 250 Hz
//! single-lead front end.

// ===== HISTORY =====

/// Default history capacity in samples.
///
/// 600 samples = 2.4 s at 250 Hz:
/// - covers 1.66 RR intervals down to ~42 bpm
/// - 600 frames × 72 bytes/frame = ~43KB
///
/// Source: back-search lookback requirement
pub const DEFAULT_HISTORY_SIZE: usize = 600;

/// Slots in each RR-interval history.
///
/// The running averages are means over the last 8 beats.
///
/// Source: Pan & Tompkins, 1985
pub const RR_HISTORY_LEN: usize = 8;

// ===== SIGNAL =====

/// Default sampling rate (Hz).
pub const DEFAULT_SAMPLE_RATE_HZ: u32 = 250;

/// Default moving-window integration span in samples.
///
/// ~150 ms at 250 Hz. Wide enough to merge a QRS into one energy lobe,
/// narrow enough to keep it apart from the T-wave.
pub const DEFAULT_WINDOW_SIZE: usize = 37;

/// Integration window duration (seconds) used to derive the span for other rates.
pub const INTEGRATION_WINDOW_S: f64 = 0.15;

/// Default output delay in samples.
///
/// Approximate group delay of the filter cascade: a beat marked at sample
/// `k + 22` is reported at output index `k`, aligning it with the raw R-wave.
pub const DEFAULT_OUTPUT_DELAY: usize = 22;

/// Amplitude an acquisition driver reports when it has no more samples.
///
/// Outside the range of a 12-bit ADC reading.
pub const NO_SAMPLE_SENTINEL: i32 = -32000;
