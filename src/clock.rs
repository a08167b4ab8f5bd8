//! Injectable time sources for the rate controllers.
//!
//! Controllers never read the system time directly; they ask a [`Clock`].
//! A clock must be non-decreasing across calls. A clock that goes backwards is
//! reported as [`TimeTableError::ExpiredTick`](crate::TimeTableError::ExpiredTick)
//! the next time an entry is recorded.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::types::Tick;

/// A monotonic source of integer ticks.
pub trait Clock {
    /// The current tick.
    fn now(&self) -> Tick;

    /// Blocks the calling thread for `ticks`. The default treats one tick as
    /// one millisecond. Non-positive values return immediately.
    fn sleep(&self, ticks: Tick) {
        if ticks > 0 {
            thread::sleep(Duration::from_millis(ticks as u64));
        }
    }
}

impl<F> Clock for F
where
    F: Fn() -> Tick,
{
    #[inline]
    fn now(&self) -> Tick {
        self()
    }
}

/// Milliseconds elapsed since the clock was created, read from [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Tick {
        Tick::try_from(self.origin.elapsed().as_millis()).unwrap_or(Tick::MAX)
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give another
/// to a controller. [`sleep`](Clock::sleep) advances the time instead of
/// blocking, which makes pacing behavior observable without real waits.
///
/// ```rust
/// use rate_window_core::clock::{Clock, ManualClock};
///
/// let clock = ManualClock::new(100);
/// let shared = clock.clone();
/// clock.advance(50);
/// assert_eq!(shared.now(), 150);
/// shared.sleep(25);
/// assert_eq!(clock.now(), 175);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    tick: Arc<AtomicI64>,
}

impl ManualClock {
    pub fn new(start: Tick) -> Self {
        Self {
            tick: Arc::new(AtomicI64::new(start)),
        }
    }

    /// Jumps to `tick`. Moving backwards is allowed here, but the controllers
    /// will reject the next entry recorded at an earlier tick.
    pub fn set(&self, tick: Tick) {
        self.tick.store(tick, Ordering::SeqCst);
    }

    /// Moves the clock forward by `ticks`.
    pub fn advance(&self, ticks: Tick) {
        self.tick.fetch_add(ticks, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now(&self) -> Tick {
        self.tick.load(Ordering::SeqCst)
    }

    fn sleep(&self, ticks: Tick) {
        if ticks > 0 {
            self.advance(ticks);
        }
    }
}
