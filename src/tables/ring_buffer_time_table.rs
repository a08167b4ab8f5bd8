use std::iter::FusedIterator;

use tracing::{debug, warn};

use crate::error::TimeTableError;
use crate::time_table::{TimeTable, TimeTableEntry};
use crate::types::{Amount, Tick};

/// Default number of slots a new table starts with.
pub const DEFAULT_BUFFER_SIZE: usize = 64;

/// Default ceiling multiplier: a table may grow to this many times its initial size.
pub const DEFAULT_GROWTH_LIMIT: usize = 64;

/// Array-backed circular implementation of [`TimeTable`].
///
/// Entries live in a fixed-size slot array between two cursors: `read` points
/// at the oldest live entry and `write` at the next free slot. One slot is
/// always kept free so that `read == write` unambiguously means empty, hence a
/// buffer of size `n` holds at most `n - 1` entries.
///
/// When an insertion finds the buffer full, the buffer doubles (capped at
/// `max_buffer_size`) and the live entries are compacted to the start of the
/// new array in order.
///
/// # Example
///
/// ```rust
/// use rate_window_core::{RingBufferTimeTable, TimeTable};
///
/// let mut table = RingBufferTimeTable::new(4, 8).unwrap();
/// table.add_entry(1, 0).unwrap();
/// table.add_entry(2, 1).unwrap();
/// table.add_entry(4, 2).unwrap();
///
/// assert_eq!(table.current_sum(), 7);
/// assert_eq!(table.sum_before(1), 1);
/// assert_eq!(table.sum_after(1), 4);
/// assert_eq!(table.minimum_sum_reached(3), Some(1));
///
/// table.purge_entries_before(1);
/// assert_eq!(table.entry_count(), 2);
/// assert_eq!(table.current_sum(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct RingBufferTimeTable {
    /// Slot array; only the region `read..write` (wrapping) is live
    slots: Box<[TimeTableEntry]>,
    /// Upper bound for `slots.len()`
    max_buffer_size: usize,
    /// Index of the oldest live entry
    read: usize,
    /// Index of the next free slot
    write: usize,
    /// Sum of all live amounts
    sum: Amount,
}

impl Default for RingBufferTimeTable {
    fn default() -> Self {
        Self {
            slots: vec![TimeTableEntry::default(); DEFAULT_BUFFER_SIZE].into_boxed_slice(),
            max_buffer_size: DEFAULT_BUFFER_SIZE * DEFAULT_GROWTH_LIMIT,
            read: 0,
            write: 0,
            sum: 0,
        }
    }
}

impl RingBufferTimeTable {
    /// Creates an empty table with `buffer_size` slots that may grow up to
    /// `max_buffer_size` slots.
    ///
    /// # Errors
    ///
    /// Returns [`TimeTableError::InvalidConfig`] if `buffer_size < 2` or
    /// `max_buffer_size < buffer_size`.
    pub fn new(buffer_size: usize, max_buffer_size: usize) -> Result<Self, TimeTableError> {
        if buffer_size < 2 || max_buffer_size < buffer_size {
            return Err(TimeTableError::InvalidConfig {
                buffer_size,
                max_buffer_size,
            });
        }

        Ok(Self {
            slots: vec![TimeTableEntry::default(); buffer_size].into_boxed_slice(),
            max_buffer_size,
            read: 0,
            write: 0,
            sum: 0,
        })
    }

    /// Creates an empty table with `buffer_size` slots and the default
    /// ceiling of `64 * buffer_size`.
    pub fn with_buffer_size(buffer_size: usize) -> Result<Self, TimeTableError> {
        Self::new(buffer_size, buffer_size.saturating_mul(DEFAULT_GROWTH_LIMIT))
    }

    /// Current number of slots.
    #[inline]
    pub fn current_buffer_size(&self) -> usize {
        self.slots.len()
    }

    /// The size past which the buffer never grows.
    #[inline]
    pub fn max_buffer_size(&self) -> usize {
        self.max_buffer_size
    }

    /// Borrowing iterator over the live entries, oldest first.
    ///
    /// The iterator is double-ended, so `.rev()` walks newest first.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            slots: &self.slots,
            front: self.read,
            remaining: self.entry_count(),
        }
    }

    /// Moves the live entries into a buffer of `new_size` slots, keeping their
    /// order. Can grow or shrink the buffer.
    ///
    /// # Errors
    ///
    /// * [`TimeTableError::BeyondMaxBufferSize`] if `new_size > max_buffer_size`
    /// * [`TimeTableError::BufferTooSmall`] if `new_size` slots cannot hold
    ///   the current entries (one slot always stays free)
    pub fn resize_buffer(&mut self, new_size: usize) -> Result<(), TimeTableError> {
        if new_size > self.max_buffer_size {
            return Err(TimeTableError::BeyondMaxBufferSize {
                requested: new_size,
                max_buffer_size: self.max_buffer_size,
            });
        }
        let entries = self.entry_count();
        if new_size <= entries {
            return Err(TimeTableError::BufferTooSmall {
                requested: new_size,
                entries,
            });
        }

        let mut slots = vec![TimeTableEntry::default(); new_size].into_boxed_slice();
        for (slot, entry) in slots.iter_mut().zip(self.iter()) {
            *slot = entry;
        }

        debug!(
            old_size = self.slots.len(),
            new_size,
            entries,
            "Resized time table buffer"
        );

        self.slots = slots;
        self.read = 0;
        self.write = entries;
        Ok(())
    }

    #[inline]
    fn next_index(&self, index: usize) -> usize {
        (index + 1) % self.slots.len()
    }

    #[inline]
    fn newest(&self) -> Option<&TimeTableEntry> {
        if self.read == self.write {
            None
        } else {
            let len = self.slots.len();
            Some(&self.slots[(self.write + len - 1) % len])
        }
    }

    /// Doubles the buffer, capped at `max_buffer_size`.
    fn grow(&mut self) -> Result<(), TimeTableError> {
        let current = self.slots.len();
        let target = current.saturating_mul(2).min(self.max_buffer_size);
        if target <= current {
            return Err(TimeTableError::BeyondMaxBufferSize {
                requested: current.saturating_mul(2),
                max_buffer_size: self.max_buffer_size,
            });
        }
        self.resize_buffer(target)
    }
}

impl TimeTable for RingBufferTimeTable {
    fn add_entry(&mut self, amount: Amount, tick: Tick) -> Result<(), TimeTableError> {
        if tick < 0 {
            return Err(TimeTableError::NegativeTick { tick });
        }
        if amount < 0 {
            return Err(TimeTableError::NegativeAmount { amount });
        }
        if let Some(newest) = self.newest() {
            if newest.tick > tick {
                let last_tick = newest.tick;
                warn!(last_tick, tick, "Rejected time table entry older than newest entry");
                return Err(TimeTableError::ExpiredTick { last_tick, tick });
            }
        }
        let sum = self
            .sum
            .checked_add(amount)
            .ok_or(TimeTableError::Overflow {
                current_sum: self.sum,
                amount,
            })?;

        // Growing is the last fallible step, so a failure leaves the table as it was
        if self.next_index(self.write) == self.read {
            self.grow()?;
        }

        self.slots[self.write] = TimeTableEntry::new(tick, amount);
        self.write = self.next_index(self.write);
        self.sum = sum;
        Ok(())
    }

    fn purge_entries_before(&mut self, deadline: Tick) {
        while self.read != self.write && self.slots[self.read].tick < deadline {
            self.sum -= self.slots[self.read].amount;
            self.read = self.next_index(self.read);
        }
    }

    fn clear(&mut self) {
        self.read = 0;
        self.write = 0;
        self.sum = 0;
    }

    #[inline]
    fn current_sum(&self) -> Amount {
        self.sum
    }

    #[inline]
    fn entry_count(&self) -> usize {
        if self.read <= self.write {
            self.write - self.read
        } else {
            self.slots.len() - self.read + self.write
        }
    }

    /// One slot stays free to tell a full buffer from an empty one.
    #[inline]
    fn max_entry_count(&self) -> usize {
        self.max_buffer_size - 1
    }

    #[inline]
    fn first_time(&self) -> Option<Tick> {
        if self.read == self.write {
            None
        } else {
            Some(self.slots[self.read].tick)
        }
    }

    #[inline]
    fn last_time(&self) -> Option<Tick> {
        self.newest().map(|entry| entry.tick)
    }

    fn entries(&self) -> Vec<TimeTableEntry> {
        self.iter().collect()
    }

    fn sum_before(&self, deadline: Tick) -> Amount {
        self.iter()
            .take_while(|entry| entry.tick < deadline)
            .map(|entry| entry.amount)
            .sum()
    }

    fn sum_after(&self, deadline: Tick) -> Amount {
        self.iter()
            .rev()
            .take_while(|entry| entry.tick > deadline)
            .map(|entry| entry.amount)
            .sum()
    }

    fn minimum_sum_reached(&self, required_sum: Amount) -> Option<Tick> {
        let mut running: Amount = 0;
        self.iter().find_map(|entry| {
            running += entry.amount;
            (running >= required_sum).then_some(entry.tick)
        })
    }
}

impl<'a> IntoIterator for &'a RingBufferTimeTable {
    type Item = TimeTableEntry;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the live entries of a [`RingBufferTimeTable`].
#[derive(Debug, Clone)]
pub struct Iter<'a> {
    slots: &'a [TimeTableEntry],
    front: usize,
    remaining: usize,
}

impl Iterator for Iter<'_> {
    type Item = TimeTableEntry;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.slots[self.front];
        self.front = (self.front + 1) % self.slots.len();
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl DoubleEndedIterator for Iter<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.slots[(self.front + self.remaining) % self.slots.len()])
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
