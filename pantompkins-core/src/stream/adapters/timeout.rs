//! Run timer for streams
//!
//! Ends a stream once a fixed wall time has elapsed, the way a device stops
//! its acquisition loop when its run timer expires.

use crate::stream::{Stream, StreamError};
use crate::time::{TimeSource, Timestamp};

/// Run timer used by the reference firmware
pub const DEFAULT_RUN_TIMEOUT_MS: u64 = 2000;

/// Stream adapter that ends after `timeout_ms`
///
/// The timer starts when the adapter is created. Once it expires the
/// adapter reports `EndOfStream` without polling the inner stream again.
///
/// ## Example
/// ```rust
/// use pantompkins_core::stream::{MemoryStream, TimeoutStream};
/// use pantompkins_core::time::FixedTime;
/// use pantompkins_core::traits::Stream;
///
/// let samples = [926, 920, 916];
/// let clock = FixedTime::new(0);
/// let mut timed = TimeoutStream::new(MemoryStream::new(&samples), 2000, &clock);
///
/// assert!(timed.poll_next().is_ok());
/// clock.advance(2000);
/// assert!(timed.poll_next().is_err());
/// ```
pub struct TimeoutStream<S, T: TimeSource> {
    /// Inner stream
    inner: S,
    /// Time source
    time_source: T,
    /// Time the run started
    started: Timestamp,
    /// Run length
    timeout_ms: u64,
    /// Timer already fired
    expired: bool,
}

impl<S, T: TimeSource> TimeoutStream<S, T> {
    /// Start a run timer of `timeout_ms` around `inner`
    pub fn new(inner: S, timeout_ms: u64, time_source: T) -> Self {
        Self {
            inner,
            started: time_source.now(),
            time_source,
            timeout_ms,
            expired: false,
        }
    }

    /// Milliseconds since the timer started
    pub fn elapsed_ms(&self) -> u64 {
        self.time_source.now().saturating_sub(self.started)
    }

    /// Whether the timer has fired
    pub fn is_expired(&self) -> bool {
        self.expired
    }

    /// Unwrap the inner stream
    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S, T, E> Stream for TimeoutStream<S, T>
where
    S: Stream<Error = StreamError<E>>,
    T: TimeSource,
{
    type Item = S::Item;
    type Error = StreamError<E>;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        if !self.expired && self.elapsed_ms() >= self.timeout_ms {
            log_debug!("Run timer expired after {} ms", self.elapsed_ms());
            self.expired = true;
        }

        if self.expired {
            return Err(nb::Error::Other(StreamError::EndOfStream));
        }

        self.inner.poll_next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // The timer may end the stream early
        let (_min, max) = self.inner.size_hint();
        (0, max)
    }
}
