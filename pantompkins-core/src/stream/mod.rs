//! Sample sources
//!
//! The pipeline driver pulls samples through the [`Stream`] trait. This
//! module holds the concrete sources and the adapters that decide when a
//! stream ends:
//! - `memory` - replay of an in-memory recording
//! - `file` - one integer sample per line from a text recording (requires `std`)
//! - `adapters` - run timer and sentinel end-of-input detection

use core::fmt;

#[cfg(feature = "stream-memory")]
pub mod memory;

#[cfg(feature = "stream-file")]
pub mod file;

#[cfg(feature = "stream-adapters")]
pub mod adapters;

// Re-export commonly used types
#[cfg(feature = "stream-memory")]
pub use memory::MemoryStream;

#[cfg(feature = "stream-file")]
pub use file::{FileStream, FileStreamStats};

#[cfg(feature = "stream-adapters")]
pub use adapters::{SentinelStream, TimeoutStream};

/// Errors that can occur while pulling samples
#[derive(Debug, Clone, PartialEq)]
pub enum StreamError<E> {
    /// Transport-level error (e.g., I/O error)
    Transport(E),
    /// Data format error
    Format(&'static str),
    /// End of stream reached
    EndOfStream,
    /// Buffer overflow
    Overflow,
}

impl<E> StreamError<E> {
    /// Normal termination rather than a failure
    pub fn is_end_of_stream(&self) -> bool {
        matches!(self, Self::EndOfStream)
    }
}

impl<E: fmt::Display> fmt::Display for StreamError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "Transport error: {}", e),
            Self::Format(msg) => write!(f, "Format error: {}", msg),
            Self::EndOfStream => write!(f, "End of stream"),
            Self::Overflow => write!(f, "Buffer overflow"),
        }
    }
}

#[cfg(feature = "defmt")]
impl<E> defmt::Format for StreamError<E> {
    fn format(&self, f: defmt::Formatter) {
        match self {
            Self::Transport(_) => defmt::write!(f, "Transport error"),
            Self::Format(msg) => defmt::write!(f, "Format error: {}", msg),
            Self::EndOfStream => defmt::write!(f, "End of stream"),
            Self::Overflow => defmt::write!(f, "Buffer overflow"),
        }
    }
}

// Re-export the trait for convenience
pub use crate::traits::Stream;
