//! Memory-based streams for testing and replay
//!
//! Replays a recording held in memory, one sample per poll. Useful for:
//! - Unit testing
//! - Replaying recorded ECG strips
//! - Feeding synthetic signals

use super::{Stream, StreamError};
use crate::Sample;

/// Replays a slice of samples
///
/// ## Example
///
/// ```rust
/// use pantompkins_core::stream::MemoryStream;
/// use pantompkins_core::traits::Stream;
///
/// let samples = [926, 920, 916];
/// let mut stream = MemoryStream::new(&samples);
///
/// assert_eq!(stream.poll_next().ok(), Some(926));
/// assert_eq!(stream.size_hint(), (2, Some(2)));
/// ```
#[derive(Debug, Clone)]
pub struct MemoryStream<'a> {
    /// Recording to replay
    samples: &'a [Sample],
    /// Current position
    position: usize,
}

impl<'a> MemoryStream<'a> {
    /// Create new memory stream from slice
    pub fn new(samples: &'a [Sample]) -> Self {
        Self {
            samples,
            position: 0,
        }
    }

    /// Reset to beginning
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Get current position
    pub fn position(&self) -> usize {
        self.position
    }

    /// Check if stream is exhausted
    pub fn is_exhausted(&self) -> bool {
        self.position >= self.samples.len()
    }
}

impl<'a> Stream for MemoryStream<'a> {
    type Item = Sample;
    type Error = StreamError<()>;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        let sample = self
            .samples
            .get(self.position)
            .copied()
            .ok_or(nb::Error::Other(StreamError::EndOfStream))?;
        self.position += 1;
        Ok(sample)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.samples.len().saturating_sub(self.position);
        (remaining, Some(remaining))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_stream_basic() {
        let samples = [926, 920];
        let mut stream = MemoryStream::new(&samples);

        assert_eq!(stream.size_hint(), (2, Some(2)));
        assert_eq!(stream.poll_next().ok(), Some(926));
        assert_eq!(stream.size_hint(), (1, Some(1)));
        assert_eq!(stream.poll_next().ok(), Some(920));

        assert!(stream.is_exhausted());
        assert!(matches!(
            stream.poll_next(),
            Err(nb::Error::Other(StreamError::EndOfStream))
        ));
        // Sticky
        assert!(matches!(
            stream.poll_next(),
            Err(nb::Error::Other(StreamError::EndOfStream))
        ));
    }

    #[test]
    fn memory_stream_reset() {
        let samples = [1024];
        let mut stream = MemoryStream::new(&samples);

        stream.poll_next().unwrap();
        assert!(stream.is_exhausted());

        stream.reset();
        assert!(!stream.is_exhausted());
        assert_eq!(stream.position(), 0);
        assert_eq!(stream.poll_next().ok(), Some(1024));
    }

    #[test]
    fn empty_recording_ends_immediately() {
        let mut stream = MemoryStream::new(&[]);
        assert_eq!(stream.size_hint(), (0, Some(0)));
        assert!(stream.poll_next().is_err());
    }
}
