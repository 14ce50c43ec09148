//! Common test utilities and signal generators for integration tests
//!
//! This module provides:
//! - A synthetic ECG generator (Gaussian Q, R, S and T waves on a baseline)
//! - Helpers that run a detector and collect beats and outputs

#![allow(dead_code)]

use pantompkins_core::{BeatEvent, BeatKind, DetectorConfig, QrsDetector, Sample};

/// Default sampling rate of the generated signals
pub const FS: u32 = 250;

/// Synthetic single-lead ECG
///
/// Beat `b` has its R peak at `first + b * period`. Each complex is a narrow
/// R wave flanked by small Q and S dips, followed 280 ms later by a broad
/// T wave. One beat can be attenuated to simulate a missed complex.
#[derive(Debug, Clone)]
pub struct EcgBuilder {
    beats: usize,
    period: usize,
    amplitude: f64,
    t_amplitude: f64,
    baseline: f64,
    first: usize,
    noise: u32,
    seed: u32,
    attenuated: Option<(usize, f64)>,
}

impl EcgBuilder {
    /// `beats` complexes `period` samples apart
    pub fn new(beats: usize, period: usize) -> Self {
        Self {
            beats,
            period,
            amplitude: 600.0,
            t_amplitude: 120.0,
            baseline: 900.0,
            first: 100,
            noise: 0,
            seed: 7,
            attenuated: None,
        }
    }

    /// Scale one beat's QRS amplitude
    pub fn attenuate(mut self, beat: usize, scale: f64) -> Self {
        self.attenuated = Some((beat, scale));
        self
    }

    /// Add uniform integer noise in `[-noise, noise]` from a fixed-seed LCG
    pub fn noise(mut self, noise: u32) -> Self {
        self.noise = noise;
        self
    }

    /// Index of the R peak of beat `b`
    pub fn r_peak(&self, beat: usize) -> usize {
        self.first + beat * self.period
    }

    /// Render the samples; one extra period of tail follows the last beat
    pub fn build(&self) -> Vec<Sample> {
        let len = self.first + self.period * self.beats + self.period;
        let t_offset = (0.28 * FS as f64) as i64;
        let mut state = self.seed;

        (0..len as i64)
            .map(|i| {
                let mut v = self.baseline;
                for b in 0..self.beats {
                    let center = (self.first + b * self.period) as i64;
                    let scale = match self.attenuated {
                        Some((beat, scale)) if beat == b => scale,
                        _ => 1.0,
                    };
                    let a = self.amplitude * scale;
                    let d = i - center;

                    v += a * (-((d * d) as f64) / 18.0).exp();
                    v -= 0.15 * a * (-(((d + 8) * (d + 8)) as f64) / 18.0).exp();
                    v -= 0.2 * a * (-(((d - 8) * (d - 8)) as f64) / 18.0).exp();

                    let t = i - (center + t_offset);
                    v += self.t_amplitude * (-((t * t) as f64) / 288.0).exp();
                }

                if self.noise > 0 {
                    state = state.wrapping_mul(1_103_515_245).wrapping_add(12_345) & 0x7fff_ffff;
                    v += (state % (2 * self.noise + 1)) as f64 - self.noise as f64;
                }

                v.round() as Sample
            })
            .collect()
    }
}

/// Everything a run produced
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Trace {
    /// Beats in detection order
    pub beats: Vec<BeatEvent>,
    /// One decision per sample
    pub output: Vec<bool>,
}

impl Trace {
    /// Indices of all beats
    pub fn beat_indices(&self) -> Vec<u64> {
        self.beats.iter().map(|beat| beat.index).collect()
    }

    /// Beats the back-search recovered
    pub fn recovered(&self) -> Vec<BeatEvent> {
        self.beats
            .iter()
            .copied()
            .filter(|beat| beat.kind == BeatKind::BackSearch)
            .collect()
    }

    /// Output positions holding `true`
    pub fn marked_outputs(&self) -> Vec<u64> {
        self.output
            .iter()
            .enumerate()
            .filter(|(_, &beat)| beat)
            .map(|(i, _)| i as u64)
            .collect()
    }
}

/// Run a default detector over `signal`, recording every beat as it happens
pub fn trace(signal: &[Sample]) -> Trace {
    trace_with::<600>(signal, DetectorConfig::default())
}

/// Same as [`trace`] with an explicit history size and configuration
pub fn trace_with<const N: usize>(signal: &[Sample], config: DetectorConfig) -> Trace {
    let mut detector = QrsDetector::<N>::new(config).expect("valid configuration");
    let mut trace = Trace::default();

    for &sample in signal {
        let before = detector.beats_detected();
        detector.process(sample, &mut trace.output).expect("sample accepted");
        if detector.beats_detected() > before {
            trace.beats.extend(detector.last_beat());
        }
    }

    detector.finish(&mut trace.output).expect("flush");
    trace
}

/// Differences between consecutive indices
pub fn gaps(indices: &[u64]) -> Vec<u64> {
    indices.windows(2).map(|w| w[1] - w[0]).collect()
}
