//! Streaming QRS detector
//!
//! [`QrsDetector`] ties the stages together. Each admitted sample goes
//! through the same steps:
//!
//! ```text
//!  sample ─► FilterCascade ─► SignalHistory ─► peak decision ─► RrTracker
//!                                  │  ▲              │
//!                    settled frames │  └─ back-search ┘ (beat overdue)
//!                                  ▼
//!                    OutputSink ◄─ Decision (output[k] = beat mark of k + DELAY)
//! ```
//!
//! ## Peak Decision
//!
//! A sample is a candidate when its integrated energy `I` or band-passed
//! amplitude `F` reaches the primary threshold. Only a sample that reaches
//! both can be a beat:
//!
//! 1. Within 200 ms of the last beat it is noise (refractory period).
//! 2. Within 360 ms it is rejected as a T-wave if its slope is at most half
//!    the previous beat's slope.
//! 3. Otherwise it is a beat.
//!
//! Samples without integrated energy are never candidates, so a flat line
//! cannot satisfy the zero thresholds the detector starts with.
//!
//! When no beat arrives for longer than the RR miss limit, the back-search
//! rescans the history with the secondary thresholds and may back-date a
//! beat. Candidates that end up neither a beat nor recovered feed the noise
//! estimates.
//!
//! ## Output Timing
//!
//! Output index `k` reports the beat mark of sample `k + DELAY`; the last
//! `DELAY` outputs are `false`. A mark can still change while the back-search
//! may reach it, so a decision is released as soon as its sample is out of
//! that reach:
//!
//! - before the RR baseline exists the back-search is idle, and every sample
//!   before the current one is settled;
//! - afterwards, samples before `last beat + refractory` are settled;
//! - a frame about to leave the history is always settled.
//!
//! On a steady rhythm a decision therefore waits at most about one RR
//! interval past its `DELAY`. Every output is produced exactly once, in
//! index order, and [`QrsDetector::finish`] flushes the rest.

use crate::backsearch::{self, BeatWindows};
use crate::config::DetectorConfig;
use crate::constants::{BACKSEARCH_PEAK_WEIGHT, DEFAULT_HISTORY_SIZE, PEAK_WEIGHT, SLOPE_LOOKBACK};
use crate::errors::{DetectorError, DetectorResult};
use crate::filters::FilterCascade;
use crate::history::{SignalHistory, StageFrame};
use crate::pipeline::{Decision, OutputSink};
use crate::rr::{RhythmChange, RrSnapshot, RrTracker};
use crate::thresholds::ThresholdState;
use crate::Sample;

/// How a beat was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum BeatKind {
    /// Cleared the primary thresholds when it arrived
    Primary,
    /// Recovered later by the back-search
    BackSearch,
}

/// A detected beat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct BeatEvent {
    /// Global index of the marked sample
    pub index: u64,
    /// Detection path
    pub kind: BeatKind,
    /// Steepest squared slope over the beat and the 10 samples before it
    pub slope: i64,
}

/// Pan-Tompkins QRS detector with `N` samples of history
///
/// One detector serves one stream. All memory is inline: `N` frames of
/// stage history plus a few hundred bytes of state.
///
/// ```rust
/// use pantompkins_core::{DetectorConfig, QrsDetector};
///
/// let mut detector = QrsDetector::<600>::new(DetectorConfig::default())?;
/// let mut output: Vec<bool> = Vec::new();
///
/// for _ in 0..1000 {
///     detector.process(1024, &mut output)?;
/// }
/// detector.finish(&mut output)?;
///
/// assert_eq!(output.len(), 1000);
/// assert_eq!(detector.beats_detected(), 0);
/// # Ok::<(), pantompkins_core::DetectorError>(())
/// ```
pub struct QrsDetector<const N: usize> {
    config: DetectorConfig,
    cascade: FilterCascade,
    windows: BeatWindows,
    history: SignalHistory<N>,
    thresholds: ThresholdState,
    rr: RrTracker,
    /// Slope of the most recent beat (T-wave reference)
    last_slope: i64,
    last_beat: Option<BeatEvent>,
    beats_detected: u64,
    /// Outputs finalized so far
    emitted: u64,
    finished: bool,
}

/// Detector with the default 600-sample history
pub type DefaultDetector = QrsDetector<DEFAULT_HISTORY_SIZE>;

impl<const N: usize> QrsDetector<N> {
    /// Build a detector after validating `config` against the capacity `N`
    pub fn new(config: DetectorConfig) -> DetectorResult<Self> {
        config.validate::<N>()?;

        log_debug!(
            "QRS detector ready: {} Hz, window {}, delay {}, history {}",
            config.sample_rate_hz,
            config.window_size,
            config.output_delay,
            N
        );

        Ok(Self {
            cascade: FilterCascade::new(config.window_size),
            windows: BeatWindows {
                refractory: config.refractory_samples(),
                t_wave: config.t_wave_samples(),
            },
            config,
            history: SignalHistory::new(),
            thresholds: ThresholdState::new(),
            rr: RrTracker::new(),
            last_slope: 0,
            last_beat: None,
            beats_detected: 0,
            emitted: 0,
            finished: false,
        })
    }

    /// Admit one sample, writing every decision it settles into `sink`
    ///
    /// Returns the number of decisions written. If the cascade rejects the
    /// sample, or the sink refuses a decision, the sample is not admitted;
    /// decisions the sink already took stay written and are not repeated.
    pub fn process<O: OutputSink + ?Sized>(
        &mut self,
        sample: Sample,
        sink: &mut O,
    ) -> DetectorResult<usize> {
        if self.finished {
            return Err(DetectorError::Finished);
        }

        let frame = match self.cascade.step(&self.history, sample) {
            Ok(frame) => frame,
            Err(e) => {
                log_warn!("Sample {} rejected: {}", self.history.next_index(), e);
                return Err(e);
            }
        };

        let written = self.release(self.settled_bound(), sink)?;

        let index = frame.index;
        self.history.push(frame);
        self.detect(index, &frame);

        Ok(written)
    }

    /// Flush every pending output into `sink`
    ///
    /// After this the output holds exactly one decision per admitted sample.
    /// Further samples are refused with [`DetectorError::Finished`]. If the
    /// sink fails midway, calling `finish` again resumes where it stopped;
    /// once complete it writes nothing. Returns the number of outputs written.
    pub fn finish<O: OutputSink + ?Sized>(&mut self, sink: &mut O) -> DetectorResult<usize> {
        self.finished = true;

        let total = self.history.next_index();
        let mut written = self.release(total, sink)?;
        while self.emitted < total {
            sink.emit(Decision { index: self.emitted, beat: false })?;
            self.emitted += 1;
            written += 1;
        }

        log_debug!(
            "Stream finished: {} samples, {} beats",
            total,
            self.beats_detected
        );
        Ok(written)
    }

    /// Configuration in use
    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Current peak estimates and thresholds
    pub fn thresholds(&self) -> &ThresholdState {
        &self.thresholds
    }

    /// Current RR-interval statistics
    pub fn rr_state(&self) -> RrSnapshot {
        self.rr.snapshot()
    }

    /// Most recent beat, primary or recovered
    pub fn last_beat(&self) -> Option<BeatEvent> {
        self.last_beat
    }

    /// Samples admitted so far
    pub fn samples_processed(&self) -> u64 {
        self.history.next_index()
    }

    /// Beats found so far
    pub fn beats_detected(&self) -> u64 {
        self.beats_detected
    }

    /// Outputs finalized so far
    pub fn outputs_emitted(&self) -> u64 {
        self.emitted
    }

    /// Every stage value of a sample still held in history
    pub fn stage(&self, index: u64) -> Option<&StageFrame> {
        self.history.by_index(index)
    }

    /// Whether [`finish`](Self::finish) has been called
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Samples below this index keep their beat mark for good
    ///
    /// Evaluated before the next frame is pushed.
    fn settled_bound(&self) -> u64 {
        let next = self.history.next_index();
        let mut bound = if self.rr.has_baseline() {
            next.min(self.rr.last_beat().saturating_add(self.windows.refractory))
        } else {
            next
        };

        // The oldest frame is evicted by the coming push
        if self.history.is_full() {
            if let Some(oldest) = self.history.oldest_index() {
                bound = bound.max(oldest + 1);
            }
        }
        bound
    }

    /// Emit outputs whose marked sample lies below `bound`
    fn release<O: OutputSink + ?Sized>(&mut self, bound: u64, sink: &mut O) -> DetectorResult<usize> {
        let delay = self.config.output_delay as u64;
        let mut written = 0;

        while self.emitted + delay < bound {
            let beat = self
                .history
                .by_index(self.emitted + delay)
                .map_or(false, |frame| frame.beat);
            sink.emit(Decision { index: self.emitted, beat })?;
            self.emitted += 1;
            written += 1;
        }
        Ok(written)
    }

    fn detect(&mut self, index: u64, frame: &StageFrame) {
        let (integral, highpass) = (frame.integral, frame.highpass);
        let elapsed = index.saturating_sub(self.rr.last_beat());

        let energetic = integral > 0;
        let reaches_integrated = energetic && self.thresholds.integrated_reaches(integral);
        let reaches_filtered = energetic && self.thresholds.filtered_reaches(highpass);
        let candidate = reaches_integrated || reaches_filtered;

        if reaches_integrated && reaches_filtered {
            if self.windows.in_refractory(elapsed) {
                self.thresholds.learn_noise(integral, highpass, PEAK_WEIGHT);
                return;
            }

            let slope = self
                .history
                .max_squared(self.history.len().saturating_sub(1), SLOPE_LOOKBACK);
            if !self.windows.is_t_wave(elapsed, slope, self.last_slope) {
                let beat = BeatEvent { index, kind: BeatKind::Primary, slope };
                self.accept(beat, integral, highpass, PEAK_WEIGHT);
                return;
            }
            log_trace!("T-wave rejected at sample {} (slope {})", index, slope);
        }

        if self.backsearch_due(elapsed) {
            let found = backsearch::scan(
                &self.history,
                &self.thresholds,
                self.windows,
                self.rr.last_beat(),
                self.last_slope,
            );
            if let Some(found) = found {
                let beat = BeatEvent {
                    index: found.index,
                    kind: BeatKind::BackSearch,
                    slope: found.slope,
                };
                self.accept(beat, found.integral, found.highpass, BACKSEARCH_PEAK_WEIGHT);
                return;
            }
        }

        if candidate {
            self.thresholds.learn_noise(integral, highpass, PEAK_WEIGHT);
        }

        log_trace!(
            "sample {}: I={} F={} t_i1={} t_f1={}",
            index,
            integral,
            highpass,
            self.thresholds.integrated.primary,
            self.thresholds.filtered.primary
        );
    }

    fn backsearch_due(&self, elapsed: u64) -> bool {
        self.rr.has_baseline()
            && elapsed as f64 > self.rr.miss_limit()
            && elapsed > self.windows.refractory
    }

    fn accept(&mut self, beat: BeatEvent, integral: i64, highpass: i64, weight: f64) {
        let trained = self.thresholds.integrated.signal_peak > 0.0;
        self.thresholds.learn_signal(integral, highpass, weight);
        self.last_slope = beat.slope;
        self.history.mark_beat(beat.index);
        self.beats_detected += 1;
        self.last_beat = Some(beat);

        match beat.kind {
            BeatKind::Primary => log_debug!("QRS at sample {}", beat.index),
            BeatKind::BackSearch => log_debug!("QRS recovered by back-search at sample {}", beat.index),
        }

        match self.rr.record_beat(beat.index, trained) {
            RhythmChange::BecameIrregular => {
                self.thresholds.halve_primary();
                log_debug!("Rhythm irregular, primary thresholds halved");
            }
            RhythmChange::BecameRegular => log_debug!("Rhythm regular again"),
            RhythmChange::Unchanged => {}
        }
    }
}
