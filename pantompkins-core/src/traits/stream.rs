//! Stream Processing Traits
//!
//! Samples are pulled, not pushed. The acquisition side implements
//! [`Stream`] and the pipeline driver polls it, using the `nb` crate for
//! non-blocking I/O so the same loop runs under an RTOS timer, in a
//! bare-metal superloop, or over a recording on a workstation.
//!
//! ## Design Philosophy
//!
//! - **Pull-based**: the consumer decides when the next sample is read
//! - **Non-blocking**: `nb::Result` gives "not yet" without an async runtime
//! - **Memory-efficient**: no hidden allocations
//!
//! ## Common Patterns
//!
//! ```rust
//! use pantompkins_core::stream::{MemoryStream, StreamError};
//! use pantompkins_core::traits::Stream;
//!
//! let samples = [926, 920, 916];
//! let mut stream = MemoryStream::new(&samples);
//! let mut total = 0i64;
//!
//! loop {
//!     match stream.poll_next() {
//!         Ok(sample) => total += sample as i64,
//!         // No sample ready yet; a driver would wait for the next tick
//!         Err(nb::Error::WouldBlock) => continue,
//!         Err(nb::Error::Other(StreamError::EndOfStream)) => break,
//!         Err(nb::Error::Other(_)) => unreachable!(),
//!     }
//! }
//! assert_eq!(total, 2762);
//! ```

// StreamError is a concrete type and lives in `crate::stream`

/// Pull-based source of items
///
/// ## Implementation Notes
///
/// - Use `nb::Error::WouldBlock` when no item is ready yet
/// - Report the end of input as an error value the consumer recognises
///   (`StreamError::EndOfStream` for the streams in this crate)
/// - End-of-stream should be sticky: once reported, keep reporting it
///
/// ## Example Implementation
///
/// ```rust
/// use pantompkins_core::traits::Stream;
/// use pantompkins_core::stream::StreamError;
/// use pantompkins_core::Sample;
///
/// /// ADC FIFO filled by a conversion-complete interrupt
/// struct AdcFifo {
///     pending: Option<i32>,
/// }
///
/// impl Stream for AdcFifo {
///     type Item = Sample;
///     type Error = StreamError<()>;
///
///     fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
///         self.pending.take().ok_or(nb::Error::WouldBlock)
///     }
/// }
/// ```
///
/// ## Error Handling
///
/// Streams use a two-level error model:
/// - `nb::Error::WouldBlock` - temporary unavailability
/// - `nb::Error::Other(E)` - end of input or an actual failure
pub trait Stream {
    /// Type of items produced by the stream
    type Item;

    /// Type of errors that can occur
    type Error;

    /// Attempt to pull the next item from the stream
    ///
    /// ## Contract
    ///
    /// - This method should not block indefinitely
    /// - Multiple `WouldBlock` returns are normal and expected
    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error>;

    /// Returns bounds on remaining items
    ///
    /// Same meaning as `Iterator::size_hint()`. Used to pre-size output
    /// buffers for finite sources. The default is `(0, None)`.
    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, None)
    }
}

impl<S: Stream + ?Sized> Stream for &mut S {
    type Item = S::Item;
    type Error = S::Error;

    fn poll_next(&mut self) -> nb::Result<Self::Item, Self::Error> {
        (**self).poll_next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (**self).size_hint()
    }
}
