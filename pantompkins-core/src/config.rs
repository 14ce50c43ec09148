//! Detector configuration
//!
//! The algorithm constants are fixed (see [`constants`](crate::constants));
//! what varies between deployments is the sampling rate, the integration span,
//! the output delay and the sentinel the acquisition driver uses. These are
//! fixed for the lifetime of a detector and checked once, when it is built.
//!
//! ```rust
//! use pantompkins_core::DetectorConfig;
//!
//! // 360 Hz front end (MIT-BIH rate), window derived from 150 ms
//! let config = DetectorConfig::for_sample_rate(360).with_output_delay(0);
//! assert_eq!(config.window_size, 54);
//! assert!(config.validate::<600>().is_ok());
//! ```

use crate::constants::{
    buffers::{
        DEFAULT_OUTPUT_DELAY, DEFAULT_SAMPLE_RATE_HZ, DEFAULT_WINDOW_SIZE,
        INTEGRATION_WINDOW_S, NO_SAMPLE_SENTINEL,
    },
    filters::HIGHPASS_LOOKBACK,
    timing::{seconds_to_samples, REFRACTORY_PERIOD_S, RR_MISS_FACTOR, T_WAVE_WINDOW_S},
};
use crate::errors::{DetectorError, DetectorResult};

/// Per-deployment detector parameters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DetectorConfig {
    /// Sampling frequency `FS` in Hz
    pub sample_rate_hz: u32,

    /// Moving-window integration span in samples (~150 ms)
    pub window_size: usize,

    /// Output delay `DELAY` in samples; 0 reports beats where they were marked
    pub output_delay: usize,

    /// Amplitude the acquisition driver sends when it has no more samples
    pub sentinel: i32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: DEFAULT_SAMPLE_RATE_HZ,
            window_size: DEFAULT_WINDOW_SIZE,
            output_delay: DEFAULT_OUTPUT_DELAY,
            sentinel: NO_SAMPLE_SENTINEL,
        }
    }
}

impl DetectorConfig {
    /// Configuration for another sampling rate
    ///
    /// Derives the 150 ms integration span and scales the default output
    /// delay with the rate.
    pub fn for_sample_rate(sample_rate_hz: u32) -> Self {
        let window_size = ((INTEGRATION_WINDOW_S * sample_rate_hz as f64) as usize).max(1);
        let output_delay =
            DEFAULT_OUTPUT_DELAY * sample_rate_hz as usize / DEFAULT_SAMPLE_RATE_HZ as usize;

        Self {
            sample_rate_hz,
            window_size,
            output_delay,
            ..Self::default()
        }
    }

    /// Override the integration span
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self
    }

    /// Override the output delay
    pub fn with_output_delay(mut self, output_delay: usize) -> Self {
        self.output_delay = output_delay;
        self
    }

    /// Override the end-of-input sentinel
    pub fn with_sentinel(mut self, sentinel: i32) -> Self {
        self.sentinel = sentinel;
        self
    }

    /// Refractory period in samples (`FS/5`, 200 ms)
    pub fn refractory_samples(&self) -> u64 {
        seconds_to_samples(REFRACTORY_PERIOD_S, self.sample_rate_hz)
    }

    /// End of the T-wave discrimination window in samples (360 ms)
    pub fn t_wave_samples(&self) -> u64 {
        seconds_to_samples(T_WAVE_WINDOW_S, self.sample_rate_hz)
    }

    /// Smallest history capacity this configuration can run with
    ///
    /// The largest of the high-pass lookback, the integration span and
    /// 1.66 s of samples (the back-search reach for a one-second rhythm).
    pub fn required_history(&self) -> usize {
        let backsearch = libm::ceil(RR_MISS_FACTOR * self.sample_rate_hz as f64) as usize;
        HIGHPASS_LOOKBACK.max(backsearch).max(self.window_size)
    }

    /// Check the configuration against a history capacity of `N` samples
    pub fn validate<const N: usize>(&self) -> DetectorResult<()> {
        if self.sample_rate_hz == 0 {
            return Err(DetectorError::InvalidConfig {
                reason: "sample rate must be positive",
            });
        }

        if self.refractory_samples() == 0 {
            return Err(DetectorError::InvalidConfig {
                reason: "sample rate too low for a 200 ms refractory period",
            });
        }

        if self.window_size == 0 {
            return Err(DetectorError::InvalidConfig {
                reason: "integration window must hold at least one sample",
            });
        }

        if self.output_delay >= N {
            return Err(DetectorError::InvalidConfig {
                reason: "output delay must be shorter than the history",
            });
        }

        let required = self.required_history();
        if N < required {
            log_warn!(
                "History of {} samples rejected, configuration needs {}",
                N, required
            );
            return Err(DetectorError::BufferTooSmall {
                required,
                available: N,
            });
        }

        Ok(())
    }
}
