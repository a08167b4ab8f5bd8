//! Integer type aliases for time ticks and entry amounts.
//!
//! Both are signed so that deadlines such as `-1` or `Tick::MAX` can be passed
//! to range queries without special casing. Values stored in a table are still
//! required to be non-negative.

/// Alias for the integer type used for timestamps.
///
/// A tick is whatever unit the caller's clock produces. [`SystemClock`]
/// reports milliseconds, so that is the unit most callers end up with.
///
/// [`SystemClock`]: crate::clock::SystemClock
pub type Tick = i64;

/// Alias for the integer type used for entry weights and running sums.
pub type Amount = i64;
