use crate::clock::{Clock, SystemClock};
use crate::error::{LimitError, Result, TimeTableError};
use crate::tables::RingBufferTimeTable;
use crate::time_table::{TimePeriodInfo, TimeTable};
use crate::types::{Amount, Tick};

/// Counts calls over a trailing window of `period` ticks.
///
/// Every call to [`count`](RateCounter::count) records one unit. No value is
/// reported until a full `period` has passed since the first call, so the
/// counter never reports a misleadingly low rate from partial history.
///
/// # Example
///
/// ```rust
/// use rate_window_core::limiters::RateCounter;
///
/// let mut counter = RateCounter::new(1000).unwrap();
/// assert_eq!(counter.count_at(0).unwrap(), None);     // baseline
/// assert_eq!(counter.count_at(500).unwrap(), None);   // window not full yet
/// assert_eq!(counter.count_at(1000).unwrap(), Some(3));
/// assert_eq!(counter.count_at(1600).unwrap(), Some(2)); // entry at 0 and 500 expired
/// ```
#[derive(Debug)]
pub struct RateCounter<C = SystemClock, T = RingBufferTimeTable> {
    /// Length of the trailing window in ticks
    period: Tick,
    /// Tick of the first call, once made
    first: Option<Tick>,
    table: T,
    clock: C,
}

impl RateCounter {
    /// Creates a counter over `period` milliseconds using the system clock.
    ///
    /// # Errors
    ///
    /// Returns [`LimitError::InvalidConfig`] if `period` is negative.
    pub fn new(period: Tick) -> Result<Self> {
        Self::with_parts(period, RingBufferTimeTable::default(), SystemClock::new())
    }
}

impl<C: Clock, T: TimeTable> RateCounter<C, T> {
    /// Creates a counter with an explicit table and clock.
    pub fn with_parts(period: Tick, table: T, clock: C) -> Result<Self> {
        if period < 0 {
            return Err(LimitError::InvalidConfig("period must not be negative"));
        }
        Ok(Self {
            period,
            first: None,
            table,
            clock,
        })
    }

    #[inline]
    pub fn period(&self) -> Tick {
        self.period
    }

    /// Records one call at the clock's current tick.
    ///
    /// See [`count_at`](RateCounter::count_at).
    pub fn count(&mut self) -> Result<Option<Amount>> {
        let now = self.clock.now();
        self.count_at(now)
    }

    /// Records one call at `tick` and returns the number of calls within the
    /// trailing `period`, or `None` while less than a full `period` has
    /// elapsed since the first call.
    ///
    /// # Errors
    ///
    /// Fails with [`LimitError::Table`] if `tick` is older than the previous
    /// call or negative. The counter is left untouched in that case.
    pub fn count_at(&mut self, tick: Tick) -> Result<Option<Amount>> {
        if tick < 0 {
            return Err(TimeTableError::NegativeTick { tick }.into());
        }
        if let Some(last_tick) = self.table.last_time().filter(|last| tick < *last) {
            return Err(TimeTableError::ExpiredTick { last_tick, tick }.into());
        }
        self.table.purge_entries_before(tick.saturating_sub(self.period));
        self.table.add_entry(1, tick)?;

        match self.first {
            None => {
                self.first = Some(tick);
                return Ok(None);
            }
            Some(first) if tick - first < self.period => return Ok(None),
            Some(_) => {}
        }
        Ok(Some(self.table.current_sum()))
    }

    /// Inter-arrival statistics of the calls in the current window.
    pub fn info(&self) -> TimePeriodInfo {
        self.table.info()
    }
}
