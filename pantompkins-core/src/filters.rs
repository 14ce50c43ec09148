//! Pan-Tompkins filter cascade
//!
//! Six causal, fixed-coefficient stages run per sample in this order:
//!
//! ```text
//! raw ─► DC block ─► low-pass ─► high-pass ─► derivative ─► squaring ─► integration
//!                                    │                           │            │
//!                                    └── F (peak detector)       └── slope    └── I
//! ```
//!
//! | Stage       | Recurrence                                               |
//! |-------------|----------------------------------------------------------|
//! | DC block    | `dc[n] = trunc(x[n] - x[n-1] + 0.995·dc[n-1])`           |
//! | Low-pass    | `lp[n] = dc[n] + 2lp[n-1] - lp[n-2] - 2dc[n-6] + dc[n-12]` |
//! | High-pass   | `hp[n] = -lp[n] - hp[n-1] + 32lp[n-16] + lp[n-32]`        |
//! | Derivative  | `der[n] = hp[n] - hp[n-1]`                               |
//! | Squaring    | `sq[n] = der[n]²`                                        |
//! | Integration | mean of `sq[n-k]`, `k < WINDOWSIZE`                      |
//!
//! Terms that reach before the retained history contribute nothing, and the
//! integration divides by the number of terms it actually used. Near the
//! start of a stream the cascade therefore degrades gracefully instead of
//! reading outside the buffer.
//!
//! All arithmetic is 64-bit and checked. A value that would overflow rejects
//! the sample with [`DetectorError::Overflow`] before anything is stored.

use crate::constants::filters::{
    DC_BLOCK_POLE, HIGHPASS_LAST_TAP, HIGHPASS_MID_GAIN, HIGHPASS_MID_TAP,
    LOWPASS_LAST_TAP, LOWPASS_MID_TAP,
};
use crate::errors::{DetectorError, DetectorResult, Stage};
use crate::history::{SignalHistory, StageFrame};
use crate::Sample;

/// Filter cascade parameters
#[derive(Debug, Clone, Copy)]
pub struct FilterCascade {
    window_size: usize,
}

impl FilterCascade {
    /// Cascade with a moving-window integration span of `window_size` samples
    pub fn new(window_size: usize) -> Self {
        Self { window_size }
    }

    /// Integration span in samples
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Run one sample through every stage
    ///
    /// Reads lookback from `history` but does not modify it; the caller pushes
    /// the returned frame.
    pub fn step<const N: usize>(
        &self,
        history: &SignalHistory<N>,
        raw: Sample,
    ) -> DetectorResult<StageFrame> {
        let prev = |k: usize| history.lookback(k);
        let raw = raw as i64;

        let dc_block = match prev(1) {
            Some(p) => {
                let step = sub(raw, p.raw, Stage::DcBlock)?;
                truncate(step as f64 + DC_BLOCK_POLE * p.dc_block as f64, Stage::DcBlock)?
            }
            None => 0,
        };

        let mut lowpass = dc_block;
        if let Some(p) = prev(1) {
            lowpass = add(lowpass, mul(2, p.lowpass, Stage::LowPass)?, Stage::LowPass)?;
        }
        if let Some(p) = prev(2) {
            lowpass = sub(lowpass, p.lowpass, Stage::LowPass)?;
        }
        if let Some(p) = prev(LOWPASS_MID_TAP) {
            lowpass = sub(lowpass, mul(2, p.dc_block, Stage::LowPass)?, Stage::LowPass)?;
        }
        if let Some(p) = prev(LOWPASS_LAST_TAP) {
            lowpass = add(lowpass, p.dc_block, Stage::LowPass)?;
        }

        let mut highpass = lowpass
            .checked_neg()
            .ok_or(DetectorError::Overflow { stage: Stage::HighPass })?;
        if let Some(p) = prev(1) {
            highpass = sub(highpass, p.highpass, Stage::HighPass)?;
        }
        if let Some(p) = prev(HIGHPASS_MID_TAP) {
            let tap = mul(HIGHPASS_MID_GAIN, p.lowpass, Stage::HighPass)?;
            highpass = add(highpass, tap, Stage::HighPass)?;
        }
        if let Some(p) = prev(HIGHPASS_LAST_TAP) {
            highpass = add(highpass, p.lowpass, Stage::HighPass)?;
        }

        let derivative = match prev(1) {
            Some(p) => sub(highpass, p.highpass, Stage::Derivative)?,
            None => highpass,
        };

        let squared = mul(derivative, derivative, Stage::Squared)?;

        let mut sum = squared;
        let mut terms: i64 = 1;
        for k in 1..self.window_size {
            let Some(p) = prev(k) else { break };
            sum = add(sum, p.squared, Stage::Integral)?;
            terms += 1;
        }
        let integral = sum / terms;

        Ok(StageFrame {
            index: history.next_index(),
            raw,
            dc_block,
            lowpass,
            highpass,
            derivative,
            squared,
            integral,
            beat: false,
        })
    }
}

/// Truncate toward zero; values outside the `i64` range (or NaN) overflow
fn truncate(value: f64, stage: Stage) -> DetectorResult<i64> {
    if value.abs() < i64::MAX as f64 {
        Ok(value as i64)
    } else {
        Err(DetectorError::Overflow { stage })
    }
}

fn add(a: i64, b: i64, stage: Stage) -> DetectorResult<i64> {
    a.checked_add(b).ok_or(DetectorError::Overflow { stage })
}

fn sub(a: i64, b: i64, stage: Stage) -> DetectorResult<i64> {
    a.checked_sub(b).ok_or(DetectorError::Overflow { stage })
}

fn mul(a: i64, b: i64, stage: Stage) -> DetectorResult<i64> {
    a.checked_mul(b).ok_or(DetectorError::Overflow { stage })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: [Sample; 12] = [926, 920, 916, 911, 902, 896, 896, 911, 935, 961, 992, 1036];

    fn run<const N: usize>(cascade: FilterCascade, input: &[Sample]) -> Vec<StageFrame> {
        let mut history = SignalHistory::<N>::new();
        input
            .iter()
            .map(|&x| {
                let frame = cascade.step(&history, x).unwrap();
                history.push(frame);
                frame
            })
            .collect()
    }

    #[test]
    fn first_sample_has_no_lookback() {
        let frames = run::<64>(FilterCascade::new(37), &[926]);
        assert_eq!(frames[0].dc_block, 0);
        assert_eq!(frames[0].highpass, 0);
        assert_eq!(frames[0].integral, 0);
    }

    #[test]
    fn fixture_stage_values() {
        let frames = run::<64>(FilterCascade::new(37), &FIXTURE);

        let dc: Vec<i64> = frames.iter().map(|f| f.dc_block).collect();
        assert_eq!(dc, vec![0, -6, -9, -13, -21, -26, -25, -9, 15, 40, 70, 113]);

        let hp: Vec<i64> = frames.iter().map(|f| f.highpass).collect();
        assert_eq!(hp, vec![0, 6, 15, 34, 64, 109, 164, 206, 228, 204, 114, -75]);
    }

    #[test]
    fn dc_block_truncates_the_whole_sum() {
        let frames = run::<64>(FilterCascade::new(37), &FIXTURE[..9]);
        // 24 + 0.995 * -9 = 15.045, not 24 + trunc(-8.955) = 16
        assert_eq!(frames[7].dc_block, -9);
        assert_eq!(frames[8].dc_block, 15);
    }

    #[test]
    fn truncation_rejects_values_outside_i64() {
        assert_eq!(truncate(-8.955, Stage::DcBlock), Ok(-8));
        assert_eq!(
            truncate(1e19, Stage::DcBlock),
            Err(DetectorError::Overflow { stage: Stage::DcBlock })
        );
        assert!(truncate(f64::NAN, Stage::DcBlock).is_err());
    }

    #[test]
    fn integration_divides_by_terms_used() {
        let frames = run::<64>(FilterCascade::new(37), &FIXTURE[..3]);
        // squared = 0, 36, 81
        assert_eq!(frames[1].integral, 36 / 2);
        assert_eq!(frames[2].integral, (36 + 81) / 3);
    }

    #[test]
    fn constant_input_stays_silent() {
        let input = [1024; 80];
        let frames = run::<64>(FilterCascade::new(37), &input);
        assert!(frames.iter().all(|f| f.highpass == 0 && f.integral == 0));
    }

    #[test]
    fn overflow_is_reported_not_wrapped() {
        let cascade = FilterCascade::new(37);
        let mut history = SignalHistory::<64>::new();

        let first = cascade.step(&history, Sample::MAX).unwrap();
        history.push(first);

        // A full-scale swing squares past i64::MAX
        assert_eq!(
            cascade.step(&history, Sample::MIN),
            Err(DetectorError::Overflow { stage: Stage::Squared })
        );
        assert_eq!(history.len(), 1);
    }
}
