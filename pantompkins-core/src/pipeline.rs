//! Pipeline Driver: from sample source to beat decisions
//!
//! ## Overview
//!
//! The detector consumes one sample at a time and writes each decision into
//! an [`OutputSink`] as soon as it is final. This module connects it to the
//! outside world:
//!
//! ```text
//! Stream ──poll──► QrsDetector ──Decision──► OutputSink
//!   ▲                                           │
//!   └──────── StopSignal checked per sample ────┘
//! ```
//!
//! - [`run`] drives a detector from any [`Stream`] of samples until the
//!   stream ends or a [`StopSignal`] is raised, then flushes the output.
//! - [`detect`], [`detect_with`] and [`detect_into`] process a whole
//!   recording held in memory.
//!
//! ## Output Contract
//!
//! However the run ends (end of stream or stop request), the sink receives
//! exactly one decision per admitted sample, in index order. Only a source
//! failure or a detector error leaves the output short; the detector can
//! still be flushed by the caller afterwards.
//!
//! ## Cancellation
//!
//! [`StopSignal`] is a single atomic flag. It can be raised from an
//! interrupt handler, a timer callback or another thread; the driver checks
//! it before pulling each sample, so at most one more sample is processed
//! after the request.
//!
//! ```rust
//! use pantompkins_core::pipeline::{run, StopSignal};
//! use pantompkins_core::stream::MemoryStream;
//! use pantompkins_core::{DetectorConfig, QrsDetector};
//!
//! let recording = [926, 920, 916, 911, 902, 896];
//! let mut detector = QrsDetector::<600>::new(DetectorConfig::default()).unwrap();
//! let stop = StopSignal::new();
//! let mut output: Vec<bool> = Vec::new();
//!
//! let summary = run(&mut detector, MemoryStream::new(&recording), &stop, &mut output).unwrap();
//! assert_eq!(summary.samples_processed, 6);
//! assert_eq!(output.len(), 6);
//! ```

use core::fmt;
use core::sync::atomic::{AtomicBool, Ordering};

use crate::detector::QrsDetector;
use crate::errors::{DetectorError, DetectorResult};
use crate::stream::{Stream, StreamError};
use crate::Sample;

#[cfg(feature = "alloc")]
use crate::config::DetectorConfig;

/// One finalized output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Decision {
    /// Output index (the sample `output_delay` samples before the marked one)
    pub index: u64,
    /// Beat present
    pub beat: bool,
}

/// Destination for decisions
///
/// Decisions arrive once each, in increasing index order.
pub trait OutputSink {
    /// Take the next decision
    fn emit(&mut self, decision: Decision) -> DetectorResult<()>;
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn emit(&mut self, decision: Decision) -> DetectorResult<()> {
        (**self).emit(decision)
    }
}

#[cfg(feature = "alloc")]
impl OutputSink for alloc::vec::Vec<bool> {
    fn emit(&mut self, decision: Decision) -> DetectorResult<()> {
        self.push(decision.beat);
        Ok(())
    }
}

impl<const M: usize> OutputSink for heapless::Vec<bool, M> {
    fn emit(&mut self, decision: Decision) -> DetectorResult<()> {
        self.push(decision.beat)
            .map_err(|_| DetectorError::OutputFull { capacity: M })
    }
}

/// Sink that forwards each decision to a closure
///
/// ```rust
/// use pantompkins_core::pipeline::{FnSink, OutputSink, Decision};
///
/// let mut beats = 0;
/// let mut sink = FnSink(|decision: Decision| beats += decision.beat as u32);
/// sink.emit(Decision { index: 0, beat: true }).unwrap();
/// drop(sink);
/// assert_eq!(beats, 1);
/// ```
pub struct FnSink<F>(pub F);

impl<F: FnMut(Decision)> OutputSink for FnSink<F> {
    fn emit(&mut self, decision: Decision) -> DetectorResult<()> {
        (self.0)(decision);
        Ok(())
    }
}

/// Cooperative stop request shared with interrupt or timer context
#[derive(Debug, Default)]
pub struct StopSignal {
    requested: AtomicBool,
}

impl StopSignal {
    /// Signal in the "keep running" state
    ///
    /// Usable in statics:
    /// ```rust
    /// use pantompkins_core::StopSignal;
    /// static STOP: StopSignal = StopSignal::new();
    /// STOP.request_stop();
    /// assert!(STOP.is_stop_requested());
    /// ```
    pub const fn new() -> Self {
        Self {
            requested: AtomicBool::new(false),
        }
    }

    /// Ask the driver to stop before the next sample
    pub fn request_stop(&self) {
        self.requested.store(true, Ordering::Release);
    }

    /// Whether a stop has been requested
    pub fn is_stop_requested(&self) -> bool {
        self.requested.load(Ordering::Acquire)
    }

    /// Re-arm for another run
    pub fn reset(&self) {
        self.requested.store(false, Ordering::Release);
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RunSummary {
    /// Samples admitted over the detector's lifetime
    pub samples_processed: u64,
    /// Beats detected over the detector's lifetime
    pub beats_detected: u64,
    /// Decisions written to the sink during this run
    pub outputs_written: u64,
    /// Ended by a stop request rather than end of stream
    pub cancelled: bool,
}

/// Failure of a [`run`]
#[derive(Debug, Clone, PartialEq)]
pub enum RunError<E> {
    /// Detector rejected a sample or the sink rejected a decision
    Detector(DetectorError),
    /// Source failed for a reason other than end of stream
    Stream(StreamError<E>),
}

impl<E> From<DetectorError> for RunError<E> {
    fn from(error: DetectorError) -> Self {
        Self::Detector(error)
    }
}

impl<E: fmt::Display> fmt::Display for RunError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detector(e) => write!(f, "Detector error: {}", e),
            Self::Stream(e) => write!(f, "Stream error: {}", e),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug + fmt::Display> std::error::Error for RunError<E> {}

/// Drive `detector` from `source` until the stream ends or `stop` is raised
///
/// `WouldBlock` from the source is retried. Both normal endings flush the
/// detector, so the sink holds one decision per admitted sample.
pub fn run<const N: usize, S, E, O>(
    detector: &mut QrsDetector<N>,
    mut source: S,
    stop: &StopSignal,
    sink: &mut O,
) -> Result<RunSummary, RunError<E>>
where
    S: Stream<Item = Sample, Error = StreamError<E>>,
    O: OutputSink + ?Sized,
{
    let mut outputs_written: u64 = 0;
    let mut cancelled = false;

    loop {
        if stop.is_stop_requested() {
            log_debug!("Stop requested after {} samples", detector.samples_processed());
            cancelled = true;
            break;
        }

        match source.poll_next() {
            Ok(sample) => outputs_written += detector.process(sample, sink)? as u64,
            Err(nb::Error::WouldBlock) => core::hint::spin_loop(),
            Err(nb::Error::Other(StreamError::EndOfStream)) => break,
            Err(nb::Error::Other(e)) => {
                log_warn!("Sample source failed after {} samples", detector.samples_processed());
                return Err(RunError::Stream(e));
            }
        }
    }

    outputs_written += detector.finish(sink)? as u64;

    Ok(RunSummary {
        samples_processed: detector.samples_processed(),
        beats_detected: detector.beats_detected(),
        outputs_written,
        cancelled,
    })
}

/// Detect beats in a whole recording
///
/// Returns one boolean per input sample.
///
/// ```rust
/// use pantompkins_core::{detect, DetectorConfig};
///
/// let output = detect(&[0; 300], DetectorConfig::default()).unwrap();
/// assert_eq!(output.len(), 300);
/// assert!(output.iter().all(|&beat| !beat));
/// ```
#[cfg(feature = "alloc")]
pub fn detect(signal: &[Sample], config: DetectorConfig) -> DetectorResult<alloc::vec::Vec<bool>> {
    detect_with::<{ crate::constants::DEFAULT_HISTORY_SIZE }>(signal, config)
}

/// Detect beats in a whole recording with `N` samples of history
///
/// Needed when the configuration outgrows the default history, e.g. at
/// higher sampling rates.
///
/// ```rust
/// use pantompkins_core::{detect_with, DetectorConfig};
///
/// let config = DetectorConfig::for_sample_rate(500);
/// let output = detect_with::<1000>(&[0; 300], config).unwrap();
/// assert_eq!(output.len(), 300);
/// ```
#[cfg(feature = "alloc")]
pub fn detect_with<const N: usize>(
    signal: &[Sample],
    config: DetectorConfig,
) -> DetectorResult<alloc::vec::Vec<bool>> {
    let mut detector = QrsDetector::<N>::new(config)?;
    let mut output = alloc::vec::Vec::with_capacity(signal.len());
    feed(&mut detector, signal, &mut output)?;
    Ok(output)
}

/// Detect beats in a whole recording into a fixed-capacity output
///
/// Fails up front with [`DetectorError::OutputFull`] if the recording is
/// longer than `M`.
pub fn detect_into<const N: usize, const M: usize>(
    signal: &[Sample],
    config: crate::config::DetectorConfig,
    output: &mut heapless::Vec<bool, M>,
) -> DetectorResult<()> {
    if signal.len() > M.saturating_sub(output.len()) {
        return Err(DetectorError::OutputFull { capacity: M });
    }

    let mut detector = QrsDetector::<N>::new(config)?;
    feed(&mut detector, signal, output)
}

fn feed<const N: usize, O: OutputSink + ?Sized>(
    detector: &mut QrsDetector<N>,
    signal: &[Sample],
    sink: &mut O,
) -> DetectorResult<()> {
    for &sample in signal {
        detector.process(sample, sink)?;
    }
    detector.finish(sink)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DetectorConfig;
    use crate::detector::DefaultDetector;
    use crate::stream::MemoryStream;

    /// Source that fails after a number of samples
    struct Faulty {
        left: usize,
    }

    impl Stream for Faulty {
        type Item = Sample;
        type Error = StreamError<&'static str>;

        fn poll_next(&mut self) -> nb::Result<Sample, Self::Error> {
            if self.left == 0 {
                return Err(nb::Error::Other(StreamError::Transport("adc timeout")));
            }
            self.left -= 1;
            Ok(900)
        }
    }

    /// Source that alternates between a sample and "not ready"
    struct Bursty {
        ready: bool,
        left: usize,
    }

    impl Stream for Bursty {
        type Item = Sample;
        type Error = StreamError<()>;

        fn poll_next(&mut self) -> nb::Result<Sample, Self::Error> {
            if self.left == 0 {
                return Err(nb::Error::Other(StreamError::EndOfStream));
            }
            self.ready = !self.ready;
            if !self.ready {
                return Err(nb::Error::WouldBlock);
            }
            self.left -= 1;
            Ok(900)
        }
    }

    #[test]
    fn run_flushes_at_end_of_stream() {
        let recording = [900; 700];
        let mut detector = DefaultDetector::new(DetectorConfig::default()).unwrap();
        let mut output: Vec<bool> = Vec::new();

        let summary = run(&mut detector, MemoryStream::new(&recording), &StopSignal::new(), &mut output)
            .unwrap();

        assert_eq!(output.len(), 700);
        assert_eq!(
            summary,
            RunSummary { samples_processed: 700, beats_detected: 0, outputs_written: 700, cancelled: false }
        );
    }

    #[test]
    fn run_retries_would_block() {
        let mut detector = DefaultDetector::new(DetectorConfig::default()).unwrap();
        let mut output: Vec<bool> = Vec::new();

        let summary = run(
            &mut detector,
            Bursty { ready: false, left: 50 },
            &StopSignal::new(),
            &mut output,
        )
        .unwrap();
        assert_eq!(summary.samples_processed, 50);
        assert_eq!(output.len(), 50);
    }

    #[test]
    fn raised_stop_processes_nothing_more() {
        let recording = [900; 100];
        let stop = StopSignal::new();
        stop.request_stop();

        let mut detector = DefaultDetector::new(DetectorConfig::default()).unwrap();
        let mut output: Vec<bool> = Vec::new();
        let summary = run(&mut detector, MemoryStream::new(&recording), &stop, &mut output).unwrap();

        assert!(summary.cancelled);
        assert_eq!(summary.samples_processed, 0);
        assert!(output.is_empty());
    }

    #[test]
    fn source_failure_is_reported_without_flush() {
        let mut detector = DefaultDetector::new(DetectorConfig::default()).unwrap();
        let mut output: Vec<bool> = Vec::new();

        let result = run(&mut detector, Faulty { left: 30 }, &StopSignal::new(), &mut output);
        assert_eq!(result, Err(RunError::Stream(StreamError::Transport("adc timeout"))));
        assert_eq!(detector.samples_processed(), 30);

        // Caller can still flush what was admitted
        detector.finish(&mut output).unwrap();
        assert_eq!(output.len(), 30);
    }

    #[test]
    fn detect_into_checks_capacity() {
        let mut small: heapless::Vec<bool, 8> = heapless::Vec::new();
        assert_eq!(
            detect_into::<600, 8>(&[0; 9], DetectorConfig::default(), &mut small),
            Err(DetectorError::OutputFull { capacity: 8 })
        );

        let mut output: heapless::Vec<bool, 64> = heapless::Vec::new();
        detect_into::<600, 64>(&[0; 64], DetectorConfig::default(), &mut output).unwrap();
        assert_eq!(output.len(), 64);
    }

    #[test]
    fn detect_with_serves_higher_rates() {
        let config = DetectorConfig::for_sample_rate(500);
        assert_eq!(
            detect(&[0; 100], config),
            Err(DetectorError::BufferTooSmall { required: 830, available: 600 })
        );

        let output = detect_with::<1000>(&[0; 1200], config).unwrap();
        assert_eq!(output.len(), 1200);
        assert!(output.iter().all(|&beat| !beat));
    }

    #[test]
    fn heapless_sink_reports_full() {
        let mut sink: heapless::Vec<bool, 1> = heapless::Vec::new();
        sink.emit(Decision { index: 0, beat: false }).unwrap();
        assert_eq!(
            sink.emit(Decision { index: 1, beat: true }),
            Err(DetectorError::OutputFull { capacity: 1 })
        );
    }

    #[test]
    fn fn_sink_sees_indices_in_order() {
        let mut seen = Vec::new();
        let mut detector = DefaultDetector::new(DetectorConfig::default()).unwrap();
        let mut sink = FnSink(|decision: Decision| seen.push(decision.index));

        feed(&mut detector, &[900; 650], &mut sink).unwrap();
        drop(sink);
        assert_eq!(seen, (0..650).collect::<Vec<u64>>());
    }

    #[test]
    fn stop_signal_rearms() {
        let stop = StopSignal::new();
        assert!(!stop.is_stop_requested());
        stop.request_stop();
        assert!(stop.is_stop_requested());
        stop.reset();
        assert!(!stop.is_stop_requested());
    }
}
