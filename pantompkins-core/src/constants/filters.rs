//! Filter Cascade and Peak Estimate Parameters
//!
//! The low-pass and high-pass filters are the integer designs from the
//! original Pan-Tompkins paper for a 200 Hz signal; they are used unchanged
//! at other rates.

// ===== DC BLOCK =====

/// Pole of the DC-blocking filter `y[n] = x[n] - x[n-1] + a*y[n-1]`.
///
/// The feedback term is truncated toward zero after scaling so the filter
/// stays in integer arithmetic.
pub const DC_BLOCK_POLE: f64 = 0.995;

// ===== LOW PASS =====
// y[n] = 2y[n-1] - y[n-2] + x[n] - 2x[n-6] + x[n-12]

/// Delay of the centre tap of the low-pass numerator.
pub const LOWPASS_MID_TAP: usize = 6;

/// Delay of the last tap of the low-pass numerator.
pub const LOWPASS_LAST_TAP: usize = 12;

// ===== HIGH PASS =====
// y[n] = 32x[n-16] - (y[n-1] + x[n] - x[n-32])

/// Delay of the all-pass tap of the high-pass filter.
pub const HIGHPASS_MID_TAP: usize = 16;

/// Gain applied to the all-pass tap.
pub const HIGHPASS_MID_GAIN: i64 = 32;

/// Delay of the last high-pass tap.
pub const HIGHPASS_LAST_TAP: usize = 32;

/// Samples of history the high-pass needs, including the current one.
///
/// Any history buffer must be at least this large or the filter never sees
/// its full impulse response.
pub const HIGHPASS_LOOKBACK: usize = HIGHPASS_LAST_TAP + 1;

// ===== SLOPE SEARCH =====

/// Samples before a candidate searched for the steepest squared slope.
///
/// The squared derivative is "M" shaped around a QRS, so the maximum over
/// the last 10 samples is used rather than the current value.
pub const SLOPE_LOOKBACK: usize = 10;

// ===== PEAK ESTIMATES =====

/// Weight of a new peak in the running signal/noise estimates.
pub const PEAK_WEIGHT: f64 = 0.125;

/// Weight of a peak recovered by the back-search in the signal estimate.
pub const BACKSEARCH_PEAK_WEIGHT: f64 = 0.25;

/// Position of the primary threshold between noise and signal estimates.
pub const THRESHOLD_FRACTION: f64 = 0.25;

/// Secondary threshold as a fraction of the primary one.
pub const SECONDARY_THRESHOLD_RATIO: f64 = 0.5;
