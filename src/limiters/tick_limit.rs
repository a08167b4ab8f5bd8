use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::{LimitError, Result, TimeTableError};
use crate::tables::RingBufferTimeTable;
use crate::time_table::{TimePeriodInfo, TimeTable};
use crate::types::{Amount, Tick};

/// Pacing controller spreading at most `amount` ticks evenly over `period`.
///
/// Instead of letting callers burst up to a quota, each
/// [`acquire`](TickLimit::acquire) waits until the remaining time in the
/// window, shared among the ticks still allowed, has elapsed since the
/// previous tick. Once `amount` ticks have been recorded the window restarts
/// at the newest one.
///
/// `acquire` is blocking: it sleeps on the clock for the computed wait and
/// cannot be cancelled.
///
/// # Example
///
/// ```rust
/// use rate_window_core::clock::ManualClock;
/// use rate_window_core::limiters::TickLimit;
/// use rate_window_core::RingBufferTimeTable;
///
/// let clock = ManualClock::new(0);
/// let mut pacer =
///     TickLimit::with_parts(4, 1000, RingBufferTimeTable::default(), clock.clone()).unwrap();
///
/// assert_eq!(pacer.acquire().unwrap(), 0);
/// // Called immediately again, each tick is held back to a quarter period
/// assert_eq!(pacer.acquire().unwrap(), 250);
/// assert_eq!(pacer.acquire().unwrap(), 250);
/// ```
#[derive(Debug)]
pub struct TickLimit<C = SystemClock, T = RingBufferTimeTable> {
    /// Maximum ticks per window
    amount: Amount,
    /// Window length in ticks
    period: Tick,
    table: T,
    clock: C,
}

impl TickLimit {
    /// Creates a pacer of `amount` ticks per `period` milliseconds using the
    /// system clock.
    ///
    /// # Errors
    ///
    /// Returns [`LimitError::InvalidConfig`] if `amount < 1`, `period < 0`
    /// or `amount` exceeds what the default table can hold.
    pub fn new(amount: Amount, period: Tick) -> Result<Self> {
        Self::with_parts(
            amount,
            period,
            RingBufferTimeTable::default(),
            SystemClock::new(),
        )
    }
}

impl<C: Clock, T: TimeTable> TickLimit<C, T> {
    /// Creates a pacer with an explicit table and clock.
    ///
    /// The table must be able to hold `amount` ticks, otherwise the window
    /// could never restart.
    pub fn with_parts(amount: Amount, period: Tick, table: T, clock: C) -> Result<Self> {
        if amount < 1 {
            return Err(LimitError::InvalidConfig("amount must be greater than 0"));
        }
        if period < 0 {
            return Err(LimitError::InvalidConfig("period must not be negative"));
        }
        if ticks_per_window(amount) > table.max_entry_count() {
            return Err(LimitError::InvalidConfig(
                "table cannot hold amount ticks in one window",
            ));
        }
        Ok(Self {
            amount,
            period,
            table,
            clock,
        })
    }

    #[inline]
    pub fn amount(&self) -> Amount {
        self.amount
    }

    #[inline]
    pub fn period(&self) -> Tick {
        self.period
    }

    /// The target spacing for the next tick given the ticks already taken in
    /// the current window. `None` before the first tick.
    pub fn next_spacing(&self) -> Option<Tick> {
        let first = self.table.first_time()?;
        let last = self.table.last_time()?;
        let left_in_period = self.period - (last - first);
        let taken = Amount::try_from(self.table.entry_count()).unwrap_or(Amount::MAX);
        let ticks_left = (self.amount + 1 - taken).max(1);
        Some(left_in_period / ticks_left)
    }

    /// Waits until the next tick is due, records it and returns the time
    /// elapsed since the previous tick. The first call returns `0` at once.
    ///
    /// # Errors
    ///
    /// Fails with [`LimitError::Table`] if the clock went backwards.
    pub fn acquire(&mut self) -> Result<Tick> {
        let now = self.clock.now();
        let (Some(last), Some(spacing)) = (self.table.last_time(), self.next_spacing()) else {
            self.table.add_entry(1, now)?;
            return Ok(0);
        };

        if now < last {
            return Err(TimeTableError::ExpiredTick {
                last_tick: last,
                tick: now,
            }
            .into());
        }

        let wait = spacing - (now - last);
        if wait > 0 {
            self.clock.sleep(wait);
        }

        let now = self.clock.now();
        self.table.add_entry(1, now)?;
        if self.table.entry_count() >= ticks_per_window(self.amount) {
            debug!(tick = now, ticks = self.amount, "Restarting tick window");
            // Several ticks may share `now` when the spacing rounds to zero
            self.table.clear();
            self.table.add_entry(1, now)?;
        }
        Ok(now - last)
    }

    /// Forgets all ticks; the next [`acquire`](TickLimit::acquire) starts a
    /// fresh window.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Inter-arrival statistics of the ticks in the current window.
    pub fn info(&self) -> TimePeriodInfo {
        self.table.info()
    }
}

fn ticks_per_window(amount: Amount) -> usize {
    usize::try_from(amount).unwrap_or(usize::MAX)
}
