//! Back-search for missed beats
//!
//! When no beat has been found for longer than the RR miss limit, the
//! recent history is scanned again against the secondary thresholds (half
//! the primary ones). The scan starts one refractory period after the last
//! beat and stops before the current sample; the first slot that clears
//! both secondary thresholds and is not a T-wave is recovered as a beat.
//!
//! ```text
//!   last beat   refractory          scanned slots           now
//!      │◄──────────────►│◄──────────────────────────────►│    │
//!  ────┴────────────────┴────────────────────────────────┴────┴──►
//! ```
//!
//! Slots that already left the history cannot be recovered.

use crate::constants::SLOPE_LOOKBACK;
use crate::history::SignalHistory;
use crate::thresholds::ThresholdState;

/// A slot the back-search accepts as a beat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recovered {
    /// Global index of the recovered slot
    pub index: u64,
    /// Integrated value at the slot
    pub integral: i64,
    /// Band-passed value at the slot
    pub highpass: i64,
    /// Steepest squared slope ending at the slot
    pub slope: i64,
}

/// Timing limits shared by the primary detector and the back-search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BeatWindows {
    /// Peaks this close to the last beat are noise
    pub refractory: u64,
    /// Peaks this close to the last beat face the T-wave slope test
    pub t_wave: u64,
}

impl BeatWindows {
    /// Peak `elapsed` samples after the last beat falls in the refractory period
    pub fn in_refractory(&self, elapsed: u64) -> bool {
        elapsed <= self.refractory
    }

    /// Peak with a slope at most half the last beat's, close enough to be a T-wave
    pub fn is_t_wave(&self, elapsed: u64, slope: i64, last_slope: i64) -> bool {
        elapsed <= self.t_wave && slope <= last_slope / 2
    }
}

/// Scan history for the first slot that clears the secondary thresholds
///
/// The newest frame (the sample that triggered the search) is never a
/// candidate.
pub fn scan<const N: usize>(
    history: &SignalHistory<N>,
    thresholds: &ThresholdState,
    windows: BeatWindows,
    last_beat: u64,
    last_slope: i64,
) -> Option<Recovered> {
    let oldest = history.oldest_index()?;
    let start = last_beat.saturating_add(windows.refractory);
    let first_slot = start.saturating_sub(oldest) as usize;
    let end_slot = history.len().saturating_sub(1);

    for slot in first_slot..end_slot {
        let Some(frame) = history.get(slot) else { break };
        if !thresholds.exceeds_secondary(frame.integral, frame.highpass) {
            continue;
        }

        let slope = history.max_squared(slot, SLOPE_LOOKBACK);
        let elapsed = frame.index.saturating_sub(last_beat);
        if windows.is_t_wave(elapsed, slope, last_slope) {
            log_trace!("Back-search skipped T-wave at sample {}", frame.index);
            continue;
        }

        return Some(Recovered {
            index: frame.index,
            integral: frame.integral,
            highpass: frame.highpass,
            slope,
        });
    }

    None
}
