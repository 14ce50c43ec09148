//! Adaptive signal/noise peak estimates and detection thresholds
//!
//! Two feature streams are tracked in parallel: the integrated energy `I`
//! and the band-passed amplitude `F`. Each keeps a running signal-peak
//! estimate (`spk`) and noise-peak estimate (`npk`); the primary threshold
//! sits a quarter of the way from noise to signal and the secondary
//! threshold, used only by the back-search, is half of it.
//!
//! ```text
//! spk ─────────────────────────────────  (QRS peaks)
//!
//! t1  = npk + 0.25·(spk − npk) ────────  (primary)
//! t2  = 0.5·t1 ────────────────────────  (back-search)
//! npk ─────────────────────────────────  (noise peaks)
//! ```

use crate::constants::filters::{SECONDARY_THRESHOLD_RATIO, THRESHOLD_FRACTION};

/// Peak estimate and thresholds for one feature stream
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ChannelThresholds {
    /// Running signal-peak estimate
    pub signal_peak: f64,
    /// Running noise-peak estimate
    pub noise_peak: f64,
    /// Primary threshold
    pub primary: f64,
    /// Back-search threshold, always half of `primary`
    pub secondary: f64,
}

impl ChannelThresholds {
    fn learn_signal(&mut self, peak: f64, weight: f64) {
        self.signal_peak = weight * peak + (1.0 - weight) * self.signal_peak;
        self.recompute();
    }

    fn learn_noise(&mut self, peak: f64, weight: f64) {
        self.noise_peak = weight * peak + (1.0 - weight) * self.noise_peak;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.primary =
            self.noise_peak + THRESHOLD_FRACTION * (self.signal_peak - self.noise_peak);
        self.secondary = SECONDARY_THRESHOLD_RATIO * self.primary;
    }

    fn halve(&mut self) {
        self.primary /= 2.0;
        self.secondary = SECONDARY_THRESHOLD_RATIO * self.primary;
    }
}

/// Thresholds for both feature streams
///
/// Starts at zero and adapts for the lifetime of the stream; it is never
/// reset.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ThresholdState {
    /// Integrated-energy stream (`I`)
    pub integrated: ChannelThresholds,
    /// Band-passed stream (`F`)
    pub filtered: ChannelThresholds,
}

impl ThresholdState {
    /// All estimates at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// At or above the primary integrated threshold
    pub fn integrated_reaches(&self, integral: i64) -> bool {
        integral as f64 >= self.integrated.primary
    }

    /// At or above the primary band-passed threshold
    pub fn filtered_reaches(&self, highpass: i64) -> bool {
        highpass as f64 >= self.filtered.primary
    }

    /// Strictly above both back-search thresholds
    pub fn exceeds_secondary(&self, integral: i64, highpass: i64) -> bool {
        integral as f64 > self.integrated.secondary && highpass as f64 > self.filtered.secondary
    }

    /// Fold an accepted QRS peak into the signal estimates
    pub fn learn_signal(&mut self, integral: i64, highpass: i64, weight: f64) {
        self.integrated.learn_signal(integral as f64, weight);
        self.filtered.learn_signal(highpass as f64, weight);
    }

    /// Fold a rejected peak into the noise estimates
    pub fn learn_noise(&mut self, integral: i64, highpass: i64, weight: f64) {
        self.integrated.learn_noise(integral as f64, weight);
        self.filtered.learn_noise(highpass as f64, weight);
    }

    /// Halve both primary thresholds on loss of rhythm regularity
    pub fn halve_primary(&mut self) {
        self.integrated.halve();
        self.filtered.halve();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{BACKSEARCH_PEAK_WEIGHT, PEAK_WEIGHT};

    fn halves_hold(state: &ThresholdState) -> bool {
        state.integrated.secondary == 0.5 * state.integrated.primary
            && state.filtered.secondary == 0.5 * state.filtered.primary
    }

    #[test]
    fn starts_at_zero_and_zero_reaches() {
        let state = ThresholdState::new();
        assert!(state.integrated_reaches(0));
        assert!(state.filtered_reaches(0));
        assert!(!state.exceeds_secondary(0, 0));
    }

    #[test]
    fn signal_update_moves_primary_a_quarter_up() {
        let mut state = ThresholdState::new();
        state.learn_signal(8000, 800, PEAK_WEIGHT);

        assert_eq!(state.integrated.signal_peak, 1000.0);
        assert_eq!(state.integrated.primary, 250.0);
        assert_eq!(state.filtered.signal_peak, 100.0);
        assert_eq!(state.filtered.primary, 25.0);
        assert!(halves_hold(&state));
    }

    #[test]
    fn noise_update_raises_the_floor() {
        let mut state = ThresholdState::new();
        state.learn_signal(8000, 800, PEAK_WEIGHT);
        state.learn_noise(800, 80, PEAK_WEIGHT);

        // npk = 100, t1 = 100 + 0.25 * (1000 - 100)
        assert_eq!(state.integrated.noise_peak, 100.0);
        assert_eq!(state.integrated.primary, 325.0);
        assert!(halves_hold(&state));
    }

    #[test]
    fn backsearch_weight_learns_faster() {
        let mut regular = ThresholdState::new();
        let mut recovered = ThresholdState::new();
        regular.learn_signal(4000, 400, PEAK_WEIGHT);
        recovered.learn_signal(4000, 400, BACKSEARCH_PEAK_WEIGHT);

        assert_eq!(recovered.integrated.signal_peak, 1000.0);
        assert!(recovered.integrated.signal_peak > regular.integrated.signal_peak);
    }

    #[test]
    fn halving_keeps_secondary_at_half() {
        let mut state = ThresholdState::new();
        state.learn_signal(8000, 800, PEAK_WEIGHT);
        state.halve_primary();

        assert_eq!(state.integrated.primary, 125.0);
        assert_eq!(state.integrated.secondary, 62.5);
        assert!(halves_hold(&state));
    }

    #[test]
    fn secondary_comparison_is_strict() {
        let mut state = ThresholdState::new();
        state.learn_signal(8000, 800, PEAK_WEIGHT);
        // secondary = 125 / 12.5
        assert!(!state.exceeds_secondary(125, 100));
        assert!(state.exceeds_secondary(126, 13));
        assert!(!state.exceeds_secondary(126, 12));
    }
}
