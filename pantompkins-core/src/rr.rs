//! RR-interval tracking
//!
//! Two 8-slot interval histories are kept. `rr1` takes every interval;
//! `rr2` only takes intervals inside the current "normal" band, so its
//! average follows the underlying rhythm and ignores isolated misses and
//! extra beats. The band and the miss limit are derived from `rravg2`:
//!
//! | Bound    | Value           |
//! |----------|-----------------|
//! | `rrlow`  | `0.92 · rravg2` |
//! | `rrhigh` | `1.16 · rravg2` |
//! | `rrmiss` | `1.66 · rravg2` |
//!
//! The rhythm is regular while both averages agree.
//!
//! ## Seeding
//!
//! A beat only starts an interval if it was accepted against trained
//! thresholds. The very first beat of a stream clears thresholds that are
//! still zero, so it usually fires on the onset of the complex rather than
//! its peak; it records its position and nothing more. The first interval
//! between two trained beats fills every slot of both histories, which
//! gives a usable baseline immediately. Until then all bounds stay at zero
//! and the back-search is never triggered.

use crate::buffer::CircularBuffer;
use crate::constants::{RR_HIGH_FACTOR, RR_HISTORY_LEN, RR_LOW_FACTOR, RR_MISS_FACTOR};

/// Result of feeding one beat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RhythmChange {
    /// Regularity unchanged
    Unchanged,
    /// Averages diverged: the rhythm just became irregular
    BecameIrregular,
    /// Averages agree again
    BecameRegular,
}

/// Snapshot of the interval statistics
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RrSnapshot {
    /// Mean of all recent intervals
    pub average_all: f64,
    /// Mean of recent in-band intervals
    pub average_normal: f64,
    /// Lower bound of the normal band
    pub low: f64,
    /// Upper bound of the normal band
    pub high: f64,
    /// Elapsed samples after which a beat counts as missed
    pub miss: f64,
    /// Both averages agree
    pub regular: bool,
}

/// Beat-to-beat interval tracker
#[derive(Debug, Clone)]
pub struct RrTracker {
    all: CircularBuffer<u64, RR_HISTORY_LEN>,
    normal: CircularBuffer<u64, RR_HISTORY_LEN>,
    average_all: f64,
    average_normal: f64,
    low: f64,
    high: f64,
    miss: f64,
    regular: bool,
    last_beat: Option<u64>,
    /// `last_beat` may start an interval
    anchored: bool,
    seeded: bool,
}

impl RrTracker {
    /// Tracker with no beats seen
    pub fn new() -> Self {
        Self {
            all: CircularBuffer::filled(0),
            normal: CircularBuffer::filled(0),
            average_all: 0.0,
            average_normal: 0.0,
            low: 0.0,
            high: 0.0,
            miss: 0.0,
            regular: true,
            last_beat: None,
            anchored: false,
            seeded: false,
        }
    }

    /// Record a beat at a global sample index
    ///
    /// `trained` tells whether the beat was accepted against a nonzero
    /// signal estimate. Beats must arrive in increasing index order.
    pub fn record_beat(&mut self, index: u64, trained: bool) -> RhythmChange {
        let previous = self.last_beat.replace(index);
        let anchored = core::mem::replace(&mut self.anchored, trained);
        let Some(previous) = previous.filter(|_| anchored) else {
            return RhythmChange::Unchanged;
        };
        let interval = index.saturating_sub(previous);

        if !self.seeded {
            self.all = CircularBuffer::filled(interval);
            self.normal = CircularBuffer::filled(interval);
            self.average_all = mean(&self.all);
            self.update_normal_average();
            self.seeded = true;
        } else {
            self.all.push(interval);
            self.average_all = mean(&self.all);

            let in_band = (interval as f64) >= self.low && (interval as f64) <= self.high;
            if in_band {
                self.normal.push(interval);
                self.update_normal_average();
            }
        }

        let was_regular = self.regular;
        self.regular = self.average_all == self.average_normal;
        match (was_regular, self.regular) {
            (true, false) => RhythmChange::BecameIrregular,
            (false, true) => RhythmChange::BecameRegular,
            _ => RhythmChange::Unchanged,
        }
    }

    /// Index of the most recent beat; 0 before any beat
    pub fn last_beat(&self) -> u64 {
        self.last_beat.unwrap_or(0)
    }

    /// Whether any beat has been recorded
    pub fn has_beat(&self) -> bool {
        self.last_beat.is_some()
    }

    /// Baseline established (one interval between trained beats seen)
    pub fn has_baseline(&self) -> bool {
        self.seeded
    }

    /// Elapsed-samples limit for the back-search; 0 without a baseline
    pub fn miss_limit(&self) -> f64 {
        self.miss
    }

    /// Current statistics
    pub fn snapshot(&self) -> RrSnapshot {
        RrSnapshot {
            average_all: self.average_all,
            average_normal: self.average_normal,
            low: self.low,
            high: self.high,
            miss: self.miss,
            regular: self.regular,
        }
    }

    fn update_normal_average(&mut self) {
        self.average_normal = mean(&self.normal);
        self.low = RR_LOW_FACTOR * self.average_normal;
        self.high = RR_HIGH_FACTOR * self.average_normal;
        self.miss = RR_MISS_FACTOR * self.average_normal;
    }
}

impl Default for RrTracker {
    fn default() -> Self {
        Self::new()
    }
}

fn mean(intervals: &CircularBuffer<u64, RR_HISTORY_LEN>) -> f64 {
    intervals.iter().sum::<u64>() as f64 / RR_HISTORY_LEN as f64
}
