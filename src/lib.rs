//! A sliding-window time table and the rate controllers built on it.
//!
//! The crate answers three questions about a stream of weighted events:
//! how much has happened recently, how much more may happen now, and how
//! long until more is allowed.
//!
//! # Quick Start
//!
//! ```rust
//! use rate_window_core::limiters::{AcquireOptions, RateLimit};
//!
//! // 100 units per 1000 ticks
//! let mut limit = RateLimit::new(100, 1000).unwrap();
//!
//! // Try to acquire 60 units at tick 0, then 60 more at tick 10
//! assert_eq!(limit.acquire_at(0, 60, AcquireOptions::WAIT), Ok(0));
//! match limit.acquire_at(10, 60, AcquireOptions::WAIT) {
//!     Ok(0) => println!("Request allowed"),
//!     Ok(wait) => println!("Retry in {} ticks", wait), // 991
//!     Err(e) => println!("Request denied: {}", e),
//! }
//! ```
//!
//! # Building Blocks
//!
//! ## [Time Table](TimeTable)
//! An ordered collection of `(tick, amount)` entries with a running sum.
//! [`RingBufferTimeTable`] implements it on a growable circular array:
//! ```rust
//! # use rate_window_core::{RingBufferTimeTable, TimeTable};
//! let mut table = RingBufferTimeTable::new(4, 8).unwrap();
//! table.add_entry(5, 10).unwrap();
//! assert_eq!(table.current_sum(), 5);
//! ```
//!
//! ## [Rate Counter](limiters::RateCounter)
//! Reports how many calls happened during the trailing window:
//! ```rust
//! # use rate_window_core::limiters::RateCounter;
//! let counter = RateCounter::new(1000).unwrap();
//! ```
//!
//! ## [Rate Limit](limiters::RateLimit)
//! Admission control over a rolling window, with reservation of future capacity:
//! ```rust
//! # use rate_window_core::limiters::RateLimit;
//! let limit = RateLimit::new(100, 1000).unwrap(); // 100 units per second
//! ```
//!
//! ## [Tick Limit](limiters::TickLimit)
//! Spaces a bounded number of events evenly across the window:
//! ```rust
//! # use rate_window_core::limiters::TickLimit;
//! let pacer = TickLimit::new(10, 1000).unwrap(); // one tick every ~100ms
//! ```
//!
//! # Core Concepts
//!
//! ## Time Representation
//! Time is an abstract [`Tick`] read from a [`Clock`](clock::Clock). The
//! default [`SystemClock`](clock::SystemClock) counts milliseconds; tests use
//! [`ManualClock`](clock::ManualClock). Clocks must never go backwards.
//!
//! ## Error Handling
//! Table operations return [`TimeTableError`], controllers return
//! [`LimitError`]. A failed call leaves every data structure as it was.
//!
//! ## Thread Safety
//! Nothing in this crate locks. Tables and controllers are single-writer and
//! take `&mut self`; wrap them in a `Mutex` to share them.

pub mod clock;
pub mod config;
pub mod error;
pub mod limiters;
pub mod tables;
pub mod time_table;
pub mod types;

pub use error::{LimitError, Result, TimeTableError};
pub use tables::RingBufferTimeTable;
pub use time_table::{TimePeriodInfo, TimeTable, TimeTableEntry};
pub use types::{Amount, Tick};
