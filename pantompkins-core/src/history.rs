//! Sliding history of every filter stage
//!
//! The filters need up to 32 samples of lookback and the back-search needs
//! the last ~1.66 RR intervals, so the detector keeps the most recent `N`
//! samples of the raw signal and of each intermediate stage.
//!
//! The seven stage values of one sample are stored together in a
//! [`StageFrame`], and the history is a ring of frames. Eviction therefore
//! always removes all seven values of the oldest sample at once: the stage
//! windows cannot drift out of alignment.
//!
//! Frames carry their global sample index, so a slot found while scanning
//! history converts straight back into a position in the input stream.

use crate::buffer::{CircularBuffer, CircularBufferIter};
use crate::errors::Stage;

/// Raw sample and every filter output for one instant
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageFrame {
    /// Global 0-based sample index
    pub index: u64,
    /// Input amplitude
    pub raw: i64,
    /// DC-blocked signal
    pub dc_block: i64,
    /// Low-pass output
    pub lowpass: i64,
    /// High-pass output (the band-passed ECG the peak detector reads)
    pub highpass: i64,
    /// First difference of the high-pass output
    pub derivative: i64,
    /// Squared derivative
    pub squared: i64,
    /// Moving-window integral of the squared derivative
    pub integral: i64,
    /// Marked as a detected beat
    pub beat: bool,
}

impl StageFrame {
    /// Value of one stage
    pub fn stage(&self, stage: Stage) -> i64 {
        match stage {
            Stage::DcBlock => self.dc_block,
            Stage::LowPass => self.lowpass,
            Stage::HighPass => self.highpass,
            Stage::Derivative => self.derivative,
            Stage::Squared => self.squared,
            Stage::Integral => self.integral,
        }
    }
}

/// Last `N` frames of the stream
#[derive(Clone)]
pub struct SignalHistory<const N: usize> {
    frames: CircularBuffer<StageFrame, N>,
    /// Global index the next admitted sample will get
    next_index: u64,
}

impl<const N: usize> SignalHistory<N> {
    /// Empty history
    pub fn new() -> Self {
        Self {
            frames: CircularBuffer::new(),
            next_index: 0,
        }
    }

    /// Global index of the next sample (= samples admitted so far)
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Frame `k` samples before the next one
    ///
    /// `k = 1` is the latest retained frame. Lookbacks of `N` or more are
    /// unavailable even if the frame is still retained: once the next frame is
    /// pushed the oldest one is gone, and every stage must see the same window.
    pub fn lookback(&self, k: usize) -> Option<&StageFrame> {
        if k == 0 || k >= N {
            return None;
        }
        self.frames.ago(k - 1)
    }

    /// Append a frame, returning the evicted oldest frame when full
    pub fn push(&mut self, frame: StageFrame) -> Option<StageFrame> {
        debug_assert_eq!(frame.index, self.next_index);
        self.next_index += 1;
        self.frames.push(frame)
    }

    /// Retained frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Next push evicts the oldest frame
    pub fn is_full(&self) -> bool {
        self.frames.is_full()
    }

    /// Nothing retained
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Most recent frame
    pub fn latest(&self) -> Option<&StageFrame> {
        self.frames.last()
    }

    /// Frame at a local slot (0 = oldest retained)
    pub fn get(&self, slot: usize) -> Option<&StageFrame> {
        self.frames.get(slot)
    }

    /// Global index of the oldest retained frame
    pub fn oldest_index(&self) -> Option<u64> {
        self.frames.get(0).map(|frame| frame.index)
    }

    /// Global index held by a local slot
    pub fn global_index(&self, slot: usize) -> Option<u64> {
        self.frames.get(slot).map(|frame| frame.index)
    }

    /// Local slot holding a global index, if still retained
    pub fn slot_of(&self, index: u64) -> Option<usize> {
        let oldest = self.oldest_index()?;
        if index < oldest || index >= self.next_index {
            return None;
        }
        Some((index - oldest) as usize)
    }

    /// Frame by global index
    pub fn by_index(&self, index: u64) -> Option<&StageFrame> {
        self.slot_of(index).and_then(|slot| self.frames.get(slot))
    }

    /// Flag the frame at a global index as a beat; false if no longer retained
    pub fn mark_beat(&mut self, index: u64) -> bool {
        match self.slot_of(index).and_then(|slot| self.frames.get_mut(slot)) {
            Some(frame) => {
                frame.beat = true;
                true
            }
            None => false,
        }
    }

    /// Steepest squared slope over a slot and the `lookback` slots before it
    ///
    /// Slots before the oldest retained frame are skipped.
    pub fn max_squared(&self, slot: usize, lookback: usize) -> i64 {
        let first = slot.saturating_sub(lookback);
        (first..=slot)
            .filter_map(|s| self.frames.get(s))
            .map(|frame| frame.squared)
            .max()
            .unwrap_or(0)
    }

    /// Retained frames, oldest first
    pub fn iter(&self) -> CircularBufferIter<'_, StageFrame, N> {
        self.frames.iter()
    }
}

impl<const N: usize> Default for SignalHistory<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(index: u64, squared: i64) -> StageFrame {
        StageFrame { index, raw: index as i64, squared, ..Default::default() }
    }

    fn filled<const N: usize>(count: u64) -> SignalHistory<N> {
        let mut history = SignalHistory::new();
        for i in 0..count {
            history.push(frame(i, (i * i) as i64));
        }
        history
    }

    #[test]
    fn evicts_whole_frames_in_order() {
        let mut history = filled::<4>(4);
        let evicted = history.push(frame(4, 16));

        assert_eq!(evicted.map(|f| f.index), Some(0));
        assert!(history.is_full());
        assert_eq!(history.oldest_index(), Some(1));
        assert_eq!(history.next_index(), 5);
        let indices: Vec<u64> = history.iter().map(|f| f.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4]);
    }

    #[test]
    fn lookback_respects_capacity() {
        let history = filled::<4>(10);

        assert_eq!(history.lookback(1).map(|f| f.index), Some(9));
        assert_eq!(history.lookback(3).map(|f| f.index), Some(7));
        // Frame 6 is retained but leaves when the next sample arrives
        assert!(history.lookback(4).is_none());
        assert!(history.lookback(0).is_none());
    }

    #[test]
    fn lookback_before_stream_start_is_absent() {
        let history = filled::<8>(2);
        assert!(history.lookback(2).is_some());
        assert!(history.lookback(3).is_none());
    }

    #[test]
    fn global_and_local_indices_convert() {
        let history = filled::<5>(12);

        assert_eq!(history.slot_of(7), Some(0));
        assert_eq!(history.slot_of(11), Some(4));
        assert_eq!(history.slot_of(6), None);
        assert_eq!(history.slot_of(12), None);
        assert_eq!(history.global_index(2), Some(9));
        assert_eq!(history.by_index(9).map(|f| f.raw), Some(9));
    }

    #[test]
    fn mark_beat_only_hits_retained_frames() {
        let mut history = filled::<5>(12);

        assert!(history.mark_beat(10));
        assert!(!history.mark_beat(3));
        assert!(history.by_index(10).map_or(false, |f| f.beat));
    }

    #[test]
    fn max_squared_clamps_at_oldest_slot() {
        let history = filled::<16>(5);
        // squared = 0, 1, 4, 9, 16
        assert_eq!(history.max_squared(2, 10), 4);
        assert_eq!(history.max_squared(4, 1), 16);
        assert_eq!(history.max_squared(0, 10), 0);
    }
}
