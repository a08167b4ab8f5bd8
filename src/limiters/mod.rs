//! Rate controllers built on a [`TimeTable`](crate::TimeTable).
//!
//! Each controller owns its table exclusively and reads time from an
//! injectable [`Clock`](crate::clock::Clock).
//!
//! # Available Controllers
//!
//! - **[`RateCounter`]** - reports how many calls happened in the trailing window
//! - **[`RateLimit`]** - admission control with waits and reservations
//! - **[`TickLimit`]** - evenly spaced pacing of recurring events
//!
//! # Thread Safety
//!
//! Controllers take `&mut self` and hold no locks. Callers sharing one across
//! threads must serialize access themselves, e.g. with one `Mutex` per
//! controller.

pub mod rate_counter;
pub use rate_counter::RateCounter;

pub mod rate_limit;
pub use rate_limit::AcquireOptions;
pub use rate_limit::RateLimit;

pub mod tick_limit;
pub use tick_limit::TickLimit;
