//! Timing Windows and RR-Interval Bounds
//!
//! Physiological limits used by the peak detector and the RR tracker. All
//! durations are in seconds and converted to samples through
//! [`DetectorConfig`](crate::config::DetectorConfig).

// ===== PEAK DETECTION WINDOWS =====

/// Refractory period after a beat (seconds).
///
/// Ventricular depolarisation cannot repeat within 200 ms, so any candidate
/// inside this window is noise.
///
/// Source: Pan & Tompkins, 1985
pub const REFRACTORY_PERIOD_S: f64 = 0.2;

/// T-wave discrimination window after a beat (seconds).
///
/// Candidates between the refractory period and 360 ms must show a slope of
/// at least half the previous beat's slope, otherwise they are T-waves.
///
/// Source: Pan & Tompkins, 1985
pub const T_WAVE_WINDOW_S: f64 = 0.36;

// ===== RR-INTERVAL BOUNDS =====

/// Lower bound of a "normal" RR interval, as a fraction of `rravg2`.
pub const RR_LOW_FACTOR: f64 = 0.92;

/// Upper bound of a "normal" RR interval, as a fraction of `rravg2`.
pub const RR_HIGH_FACTOR: f64 = 1.16;

/// Interval after which a beat counts as missed, as a fraction of `rravg2`.
///
/// Also the minimum history the back-search needs, which is why the history
/// buffer must span at least this many seconds of a one-second rhythm.
pub const RR_MISS_FACTOR: f64 = 1.66;

/// Convert a duration in seconds to whole samples (truncating).
pub fn seconds_to_samples(seconds: f64, sample_rate_hz: u32) -> u64 {
    (seconds * sample_rate_hz as f64) as u64
}
