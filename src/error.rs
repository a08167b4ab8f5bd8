//! error.rs
//! Defines the error types raised by time tables and the controllers built on them.

use crate::types::{Amount, Tick};
use thiserror::Error;

/// Errors raised by a [`TimeTable`](crate::TimeTable).
///
/// Every variant is reported before the table is touched, so a failed call
/// leaves the table exactly as it was.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeTableError {
    /// Construction parameters cannot describe a usable ring buffer.
    #[error("invalid buffer configuration: buffer_size {buffer_size} (must be >= 2), max_buffer_size {max_buffer_size} (must be >= buffer_size)")]
    InvalidConfig {
        buffer_size: usize,
        max_buffer_size: usize,
    },

    /// Entries cannot be recorded before time zero.
    #[error("negative tick: {tick}")]
    NegativeTick { tick: Tick },

    /// Entries carry non-negative weights only.
    #[error("negative amount: {amount}")]
    NegativeAmount { amount: Amount },

    /// The entry is older than the newest entry in the table.
    #[error("expired tick: {tick} is older than the newest entry at tick {last_tick}")]
    ExpiredTick { last_tick: Tick, tick: Tick },

    /// Adding the amount would overflow the running sum.
    #[error("addition of {amount} overflows the current sum {current_sum}")]
    Overflow {
        current_sum: Amount,
        amount: Amount,
    },

    /// The buffer would need to grow past its configured ceiling.
    #[error("buffer size {requested} is bigger than the max_buffer_size {max_buffer_size}")]
    BeyondMaxBufferSize {
        requested: usize,
        max_buffer_size: usize,
    },

    /// The requested buffer cannot hold the entries currently in the table.
    #[error("buffer size {requested} is too small to hold {entries} entries")]
    BufferTooSmall { requested: usize, entries: usize },
}

/// Errors raised by the rate controllers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// A controller was constructed with unusable parameters.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),

    /// A single request is larger than the whole quota and can never be granted.
    #[error("request exceeds maximum capacity: tried to acquire {acquiring}, capacity {capacity}. This request cannot succeed.")]
    BeyondCapacity { acquiring: Amount, capacity: Amount },

    /// The underlying time table rejected an operation.
    #[error(transparent)]
    Table(#[from] TimeTableError),
}

/// Result type used throughout the crate.
pub type Result<T, E = LimitError> = std::result::Result<T, E>;
