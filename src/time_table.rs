//! Core trait for time-windowed sum tables.
//!
//! A time table is an ordered collection of `(tick, amount)` entries that keeps
//! a running sum of all amounts. Entries only ever enter at the newest end and
//! leave from the oldest end, which is what lets the rate controllers in
//! [`limiters`](crate::limiters) answer "how much happened recently" and
//! "when will enough of it have expired" cheaply.

use serde::{Deserialize, Serialize};

use crate::error::TimeTableError;
use crate::types::{Amount, Tick};

/// A single recorded amount at a point in time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeTableEntry {
    pub tick: Tick,
    pub amount: Amount,
}

impl TimeTableEntry {
    pub fn new(tick: Tick, amount: Amount) -> Self {
        Self { tick, amount }
    }
}

/// Inter-arrival statistics over the entries currently held by a table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePeriodInfo {
    /// Longest gap between two consecutive entries.
    pub maximum: Tick,
    /// Shortest gap between two consecutive entries.
    pub minimum: Tick,
    /// Mean gap between consecutive entries, rounded towards zero.
    pub average: Tick,
}

/// The contract shared by all time table implementations.
///
/// Implementors must keep [`current_sum`](TimeTable::current_sum) equal to the
/// exact sum of the live entries at all times, and must reject any mutation
/// that would violate ordering or overflow without modifying themselves.
pub trait TimeTable {
    /// Records `amount` at `tick` as the newest entry.
    ///
    /// # Errors
    /// * [`TimeTableError::NegativeTick`] if `tick < 0`
    /// * [`TimeTableError::NegativeAmount`] if `amount < 0`
    /// * [`TimeTableError::ExpiredTick`] if a newer entry already exists
    /// * [`TimeTableError::Overflow`] if the running sum would overflow
    /// * [`TimeTableError::BeyondMaxBufferSize`] if the table is full and cannot grow
    fn add_entry(&mut self, amount: Amount, tick: Tick) -> Result<(), TimeTableError>;

    /// Removes every entry whose tick is strictly less than `deadline`.
    fn purge_entries_before(&mut self, deadline: Tick);

    /// Removes all entries and resets the sum to zero.
    fn clear(&mut self);

    /// The sum of the amounts of all live entries.
    fn current_sum(&self) -> Amount;

    /// The number of live entries.
    fn entry_count(&self) -> usize;

    /// The most entries the table can ever hold at once.
    fn max_entry_count(&self) -> usize;

    /// The tick of the oldest live entry, `None` if empty.
    fn first_time(&self) -> Option<Tick>;

    /// The tick of the newest live entry, `None` if empty.
    fn last_time(&self) -> Option<Tick>;

    /// A snapshot of the live entries, oldest first.
    fn entries(&self) -> Vec<TimeTableEntry>;

    /// Sum of the entries with a tick strictly less than `deadline`.
    fn sum_before(&self, deadline: Tick) -> Amount;

    /// Sum of the entries with a tick strictly greater than `deadline`.
    fn sum_after(&self, deadline: Tick) -> Amount;

    /// The tick of the first entry (oldest first) at which the running total
    /// reaches `required_sum`, or `None` if the whole table never does.
    ///
    /// This is what turns "how much capacity is missing" into "at which point
    /// in time will enough of it have been used", from which a wait follows.
    fn minimum_sum_reached(&self, required_sum: Amount) -> Option<Tick>;

    #[inline]
    fn is_empty(&self) -> bool {
        self.entry_count() == 0
    }

    /// Computes the maximum, minimum and average gap between consecutive
    /// entries in a single pass. All zero when fewer than two entries exist.
    fn info(&self) -> TimePeriodInfo {
        let mut maximum: Tick = 0;
        let mut minimum = Tick::MAX;
        let mut total: Tick = 0;
        let mut gaps: Tick = 0;
        let mut previous: Option<Tick> = None;

        for entry in self.entries() {
            if let Some(last) = previous {
                let gap = entry.tick - last;
                maximum = maximum.max(gap);
                minimum = minimum.min(gap);
                total = total.saturating_add(gap);
                gaps += 1;
            }
            previous = Some(entry.tick);
        }

        if gaps == 0 {
            return TimePeriodInfo::default();
        }
        TimePeriodInfo {
            maximum,
            minimum,
            average: total / gaps,
        }
    }
}
