//! Core Traits
//!
//! The detector itself is a concrete type; the seams where deployments plug
//! in their own hardware are expressed as traits:
//!
//! - [`stream`] - pull-based sample sources (ADC drivers, recordings)
//! - [`time`] - millisecond clocks for run timers
//!
//! Both use static dispatch, so a bare-metal build monomorphizes the
//! concrete source and clock into the processing loop.

pub mod stream;
pub mod time;

pub use stream::Stream;
pub use time::TimeSource;
