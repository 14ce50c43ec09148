//! Fixed-Size Circular Buffer for Signal History
//!
//! ## Overview
//!
//! Every stateful part of the detector looks back over a bounded number of
//! past values: the filters need up to 32 samples, the peak detector scans the
//! last few seconds, and the RR tracker averages the last 8 intervals. This
//! module provides the one ring buffer all of them share. Capacity is a const
//! generic, so the memory footprint is fixed at compile time.
//!
//! ## Design Rationale
//!
//! ### Why a Circular Buffer?
//!
//! The straightforward way to keep "the last N samples" is an array that is
//! shifted down by one on every new sample. That costs O(N) copies per sample
//! for every stage. A ring buffer gives the same view with:
//! - O(1) insertion (overwrites oldest when full, returning it)
//! - O(1) access by age or by position
//! - O(n) iteration oldest to newest
//! - Zero heap allocations
//!
//! ### Why Not Use `heapless::Deque`?
//!
//! 1. **Automatic Overwrite**: when full, the oldest value must be evicted and
//!    handed back to the caller rather than the push failing.
//!
//! 2. **Prefilled Start**: RR histories start as eight zero slots, which a
//!    const `filled` constructor expresses directly.
//!
//! ### Index Mapping
//!
//! ```text
//! Physical array:  [D, E, A, B, C]  (write_pos = 2, len = 5)
//!                   0  1  2  3  4
//!
//! Logical view:    [A, B, C, D, E]  (chronological order)
//!                   0  1  2  3  4
//!
//! Mapping: logical[i] = physical[(write_pos + N - len + i) % N]
//! ```
//!
//! ## Usage Example
//!
//! ```rust
//! use pantompkins_core::buffer::CircularBuffer;
//!
//! let mut window: CircularBuffer<i64, 3> = CircularBuffer::new();
//! window.push(1);
//! window.push(2);
//! window.push(3);
//!
//! // Fourth push evicts the oldest value
//! assert_eq!(window.push(4), Some(1));
//! assert_eq!(window.ago(0), Some(&4));
//! assert_eq!(window.get(0), Some(&2));
//! ```

/// Fixed-size circular buffer
///
/// ## Type Parameters
///
/// - `T`: stored value. `Copy` so slots can be initialised without unsafe code.
/// - `N`: maximum number of values. For best performance use powers of 2;
///   the modulo then compiles to a mask.
///
/// ## Internal Invariants
///
/// - `write_pos < N` (next write position is always valid)
/// - `len <= N` (never claim to have more items than capacity)
/// - Logical order is chronological
///
/// ## Thread Safety
///
/// Not thread-safe. Each detector owns its buffers exclusively.
#[derive(Clone, Debug)]
pub struct CircularBuffer<T, const N: usize> {
    /// Storage; slots outside `len` hold stale values and are never read
    data: [T; N],

    /// Index where the next write will occur
    write_pos: usize,

    /// Current number of valid values
    len: usize,
}

impl<T: Copy + Default, const N: usize> CircularBuffer<T, N> {
    /// Creates a new empty circular buffer
    pub fn new() -> Self {
        Self {
            data: [T::default(); N],
            write_pos: 0,
            len: 0,
        }
    }
}

impl<T: Copy, const N: usize> CircularBuffer<T, N> {
    /// Creates a full buffer with every slot holding `value`
    ///
    /// Usable in static contexts:
    /// ```rust
    /// use pantompkins_core::buffer::CircularBuffer;
    /// static ZEROS: CircularBuffer<u32, 8> = CircularBuffer::filled(0);
    /// assert!(ZEROS.is_full());
    /// ```
    pub const fn filled(value: T) -> Self {
        Self {
            data: [value; N],
            write_pos: 0,
            len: N,
        }
    }

    /// Adds a value, returning the evicted oldest value when full
    ///
    /// ```rust
    /// # use pantompkins_core::buffer::CircularBuffer;
    /// let mut buf = CircularBuffer::<u8, 2>::new();
    /// assert_eq!(buf.push(1), None);
    /// assert_eq!(buf.push(2), None);
    /// assert_eq!(buf.push(3), Some(1));
    /// ```
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = if self.len == N {
            Some(self.data[self.write_pos])
        } else {
            self.len += 1;
            None
        };

        self.data[self.write_pos] = value;
        self.write_pos = (self.write_pos + 1) % N;

        evicted
    }

    /// Get number of stored values
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Check if buffer is full
    pub fn is_full(&self) -> bool {
        self.len == N
    }

    /// Fixed capacity
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Get the most recent value
    pub fn last(&self) -> Option<&T> {
        self.ago(0)
    }

    /// Gets the value pushed `age` pushes ago (0 = newest)
    pub fn ago(&self, age: usize) -> Option<&T> {
        if age >= self.len {
            return None;
        }
        self.get(self.len - 1 - age)
    }

    /// Gets a value by its logical index (0 = oldest, len-1 = newest)
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len {
            return None;
        }
        Some(&self.data[self.physical(index)])
    }

    /// Mutable access by logical index
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.len {
            return None;
        }
        let physical = self.physical(index);
        Some(&mut self.data[physical])
    }

    /// Iterate over values from oldest to newest
    pub fn iter(&self) -> CircularBufferIter<'_, T, N> {
        CircularBufferIter {
            buffer: self,
            index: 0,
        }
    }

    /// Clear all values
    pub fn clear(&mut self) {
        self.write_pos = 0;
        self.len = 0;
    }

    /// Translate a logical index into an array position
    fn physical(&self, index: usize) -> usize {
        (self.write_pos + N - self.len + index) % N
    }
}

/// Iterator over circular buffer contents, oldest first
pub struct CircularBufferIter<'a, T, const N: usize> {
    buffer: &'a CircularBuffer<T, N>,
    index: usize,
}

impl<'a, T: Copy, const N: usize> Iterator for CircularBufferIter<'a, T, N> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.buffer.get(self.index)?;
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.buffer.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<T: Copy + Default, const N: usize> Default for CircularBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}
