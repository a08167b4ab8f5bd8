use tracing::trace;

use crate::clock::{Clock, SystemClock};
use crate::error::{LimitError, Result, TimeTableError};
use crate::tables::RingBufferTimeTable;
use crate::time_table::TimeTable;
use crate::types::{Amount, Tick};

/// How [`RateLimit::acquire_with`] treats a request that cannot be granted now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcquireOptions {
    /// Record the request at the tick it becomes admissible, claiming that
    /// capacity ahead of time.
    pub reserve: bool,
    /// Return the absolute tick at which the request becomes admissible
    /// instead of the number of ticks to wait.
    pub absolute_time: bool,
}

impl AcquireOptions {
    /// Do not reserve, return a relative wait.
    pub const WAIT: Self = Self {
        reserve: false,
        absolute_time: false,
    };

    /// Reserve, return a relative wait.
    pub const RESERVE: Self = Self {
        reserve: true,
        absolute_time: false,
    };

    pub fn absolute(mut self) -> Self {
        self.absolute_time = true;
        self
    }
}

/// Admission controller granting at most `amount` units per rolling `period`.
///
/// Every granted request is recorded in a time table. A request that would
/// push the windowed usage over `amount` is not recorded (unless reserved) and
/// is answered with how long the caller must wait until enough old usage has
/// left the window.
///
/// Reservations are recorded as entries in the future. Later requests see
/// them like any other usage, so overlapping reservations queue up behind
/// each other with increasing waits.
///
/// # Example
///
/// ```rust
/// use rate_window_core::limiters::{AcquireOptions, RateLimit};
///
/// let mut limit = RateLimit::new(100, 1000).unwrap();
///
/// assert_eq!(limit.acquire_at(0, 10, AcquireOptions::WAIT), Ok(0));
/// assert_eq!(limit.acquire_at(100, 80, AcquireOptions::WAIT), Ok(0));
///
/// // 10 units are missing; the entry at tick 0 leaves the window at 1001
/// assert_eq!(limit.acquire_at(200, 20, AcquireOptions::WAIT), Ok(801));
/// ```
#[derive(Debug)]
pub struct RateLimit<C = SystemClock, T = RingBufferTimeTable> {
    /// Maximum usage within any window
    amount: Amount,
    /// Window length in ticks
    period: Tick,
    table: T,
    clock: C,
}

impl RateLimit {
    /// Creates a limit of `amount` units per `period` milliseconds using the
    /// system clock and a default-sized table.
    ///
    /// # Errors
    ///
    /// Returns [`LimitError::InvalidConfig`] if `amount < 1` or `period < 0`.
    pub fn new(amount: Amount, period: Tick) -> Result<Self> {
        Self::with_parts(
            amount,
            period,
            RingBufferTimeTable::default(),
            SystemClock::new(),
        )
    }
}

impl<C: Clock, T: TimeTable> RateLimit<C, T> {
    /// Creates a limit with an explicit table and clock.
    pub fn with_parts(amount: Amount, period: Tick, table: T, clock: C) -> Result<Self> {
        if amount < 1 {
            return Err(LimitError::InvalidConfig("amount must be greater than 0"));
        }
        if period < 0 {
            return Err(LimitError::InvalidConfig("period must not be negative"));
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

    /// Usage within the window ending now, excluding reservations that have
    /// not taken effect yet.
    pub fn current_rate(&mut self) -> Amount {
        let now = self.clock.now();
        self.current_rate_at(now)
    }

    /// Usage within the window ending at `tick`, excluding reservations
    /// recorded after `tick`. A negative `tick` sees no usage and purges
    /// nothing.
    pub fn current_rate_at(&mut self, tick: Tick) -> Amount {
        self.table.purge_entries_before(tick.saturating_sub(self.period));
        self.table.sum_before(tick.saturating_add(1))
    }

    /// Forgets all recorded usage and reservations.
    pub fn clear(&mut self) {
        self.table.clear();
    }

    /// Requests `requested` units now without reserving.
    ///
    /// Returns `0` if granted, otherwise the number of ticks to wait before
    /// the same request would be granted.
    pub fn acquire(&mut self, requested: Amount) -> Result<Tick> {
        self.acquire_with(requested, AcquireOptions::WAIT)
    }

    /// Requests `requested` units now, reserving them for later if they
    /// cannot be granted immediately. Returns the wait until the reservation
    /// takes effect, `0` if granted at once.
    pub fn reserve(&mut self, requested: Amount) -> Result<Tick> {
        self.acquire_with(requested, AcquireOptions::RESERVE)
    }

    /// Requests `requested` units at the clock's current tick.
    ///
    /// See [`acquire_at`](RateLimit::acquire_at).
    pub fn acquire_with(&mut self, requested: Amount, options: AcquireOptions) -> Result<Tick> {
        let now = self.clock.now();
        self.acquire_at(now, requested, options)
    }

    /// Requests `requested` units at `tick`.
    ///
    /// If the window has room, the request is recorded at `tick` and `0` is
    /// returned. Otherwise the effective tick is computed as the tick at which
    /// enough earlier usage has been recorded to cover the shortfall, plus
    /// `period + 1`. With `options.reserve` the request is recorded at that
    /// effective tick. The return value is the effective tick itself with
    /// `options.absolute_time`, otherwise the wait `effective - tick`.
    ///
    /// # Errors
    ///
    /// * [`LimitError::BeyondCapacity`] if `requested > amount`; nothing is recorded
    /// * [`LimitError::Table`] with `NegativeTick` or `NegativeAmount` for
    ///   negative input, checked before anything else
    /// * [`LimitError::Table`] if the table rejects the entry or the
    ///   arithmetic would overflow
    pub fn acquire_at(
        &mut self,
        tick: Tick,
        requested: Amount,
        options: AcquireOptions,
    ) -> Result<Tick> {
        if tick < 0 {
            return Err(TimeTableError::NegativeTick { tick }.into());
        }
        if requested < 0 {
            return Err(TimeTableError::NegativeAmount { amount: requested }.into());
        }
        self.table.purge_entries_before(tick.saturating_sub(self.period));

        let current_sum = self.table.current_sum();
        let amount_missing = current_sum
            .checked_add(requested)
            .ok_or(TimeTableError::Overflow {
                current_sum,
                amount: requested,
            })?
            - self.amount;

        if amount_missing <= 0 {
            self.table.add_entry(requested, tick)?;
            trace!(tick, requested, usage = current_sum + requested, "Granted");
            return Ok(0);
        }

        let window_moves_past = self.table.minimum_sum_reached(amount_missing).ok_or(
            LimitError::BeyondCapacity {
                acquiring: requested,
                capacity: self.amount,
            },
        )?;
        let effective = window_moves_past
            .checked_add(self.period)
            .and_then(|t| t.checked_add(1))
            .ok_or(TimeTableError::Overflow {
                current_sum: window_moves_past,
                amount: self.period,
            })?;

        if options.reserve {
            self.table.add_entry(requested, effective)?;
            trace!(tick, requested, effective, "Reserved");
        } else {
            trace!(tick, requested, effective, "Delayed");
        }

        if options.absolute_time {
            Ok(effective)
        } else {
            Ok(effective - tick)
        }
    }
}
