//! Stream adapters that decide when input ends
//!
//! Acquisition front ends rarely close a stream on their own. A device
//! either runs for a fixed time or its driver starts sending a reserved
//! "no sample" value. Both are expressed as adapters that turn the
//! condition into [`StreamError::EndOfStream`](super::StreamError::EndOfStream).

pub mod sentinel;
pub mod timeout;

pub use sentinel::SentinelStream;
pub use timeout::{TimeoutStream, DEFAULT_RUN_TIMEOUT_MS};
