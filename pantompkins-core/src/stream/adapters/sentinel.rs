//! Sentinel end-of-input detection
//!
//! Some acquisition drivers never close their channel; when they run out
//! of data they report a reserved amplitude instead (−32000 by default,
//! see [`NO_SAMPLE_SENTINEL`](crate::constants::NO_SAMPLE_SENTINEL)).

use crate::stream::{Stream, StreamError};
use crate::Sample;

/// Stream adapter that ends at the first sentinel sample
///
/// The sentinel itself is never passed on.
///
/// ```rust
/// use pantompkins_core::stream::{MemoryStream, SentinelStream};
/// use pantompkins_core::traits::Stream;
///
/// let samples = [926, -32000, 920];
/// let mut stream = SentinelStream::new(MemoryStream::new(&samples), -32000);
///
/// assert_eq!(stream.poll_next().ok(), Some(926));
/// assert!(stream.poll_next().is_err());
/// assert!(stream.poll_next().is_err());
/// ```
#[derive(Debug, Clone)]
pub struct SentinelStream<S> {
    inner: S,
    sentinel: Sample,
    ended: bool,
}

impl<S> SentinelStream<S> {
    /// End `inner` at the first `sentinel`
    pub fn new(inner: S, sentinel: Sample) -> Self {
        Self {
            inner,
            sentinel,
            ended: false,
        }
    }

    /// Whether the sentinel has been seen
    pub fn sentinel_seen(&self) -> bool {
        self.ended
    }
}

impl<S, E> Stream for SentinelStream<S>
where
    S: Stream<Item = Sample, Error = StreamError<E>>,
{
    type Item = Sample;
    type Error = StreamError<E>;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        if self.ended {
            return Err(nb::Error::Other(StreamError::EndOfStream));
        }

        let sample = self.inner.poll_next()?;
        if sample == self.sentinel {
            log_debug!("No-sample sentinel received, ending stream");
            self.ended = true;
            return Err(nb::Error::Other(StreamError::EndOfStream));
        }

        Ok(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.ended {
            return (0, Some(0));
        }
        let (_min, max) = self.inner.size_hint();
        (0, max)
    }
}
