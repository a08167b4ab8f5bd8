//! Serializable configuration for tables and controllers.
//!
//! Each config converts into its component with [`TryFrom`], validating the
//! parameters on the way. Controllers built this way use the
//! [`SystemClock`](crate::clock::SystemClock), so `period` is in milliseconds.
//!
//! ```rust
//! use rate_window_core::config::RateLimitConfig;
//! use rate_window_core::limiters::RateLimit;
//!
//! let config = RateLimitConfig {
//!     amount: 100,
//!     ..RateLimitConfig::default()
//! };
//! let limit: RateLimit = config.try_into().unwrap();
//! assert_eq!(limit.period(), 1000);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{LimitError, TimeTableError};
use crate::limiters::{RateCounter, RateLimit, TickLimit};
use crate::tables::{RingBufferTimeTable, DEFAULT_BUFFER_SIZE, DEFAULT_GROWTH_LIMIT};
use crate::types::{Amount, Tick};

/// Default window length: one second of [`SystemClock`](crate::clock::SystemClock) ticks.
pub const DEFAULT_PERIOD: Tick = 1000;

fn default_period() -> Tick {
    DEFAULT_PERIOD
}

fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

/// Sizing of a [`RingBufferTimeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeTableConfig {
    /// Initial number of slots.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Ceiling for growth; `64 * buffer_size` when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_buffer_size: Option<usize>,
}

impl Default for TimeTableConfig {
    fn default() -> Self {
        Self {
            buffer_size: DEFAULT_BUFFER_SIZE,
            max_buffer_size: None,
        }
    }
}

impl TimeTableConfig {
    pub fn new(buffer_size: usize, max_buffer_size: usize) -> Self {
        Self {
            buffer_size,
            max_buffer_size: Some(max_buffer_size),
        }
    }

    /// The ceiling this config resolves to.
    pub fn resolved_max_buffer_size(&self) -> usize {
        self.max_buffer_size
            .unwrap_or_else(|| self.buffer_size.saturating_mul(DEFAULT_GROWTH_LIMIT))
    }
}

impl TryFrom<TimeTableConfig> for RingBufferTimeTable {
    type Error = TimeTableError;

    fn try_from(config: TimeTableConfig) -> Result<Self, Self::Error> {
        RingBufferTimeTable::new(config.buffer_size, config.resolved_max_buffer_size())
    }
}

/// Configuration for a [`RateLimit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum usage per window.
    pub amount: Amount,
    #[serde(default = "default_period")]
    pub period: Tick,
    #[serde(default)]
    pub table: TimeTableConfig,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            amount: 1,
            period: DEFAULT_PERIOD,
            table: TimeTableConfig::default(),
        }
    }
}

impl TryFrom<RateLimitConfig> for RateLimit {
    type Error = LimitError;

    fn try_from(config: RateLimitConfig) -> Result<Self, Self::Error> {
        let table = RingBufferTimeTable::try_from(config.table)?;
        RateLimit::with_parts(config.amount, config.period, table, Default::default())
    }
}

/// Configuration for a [`RateCounter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateCounterConfig {
    #[serde(default = "default_period")]
    pub period: Tick,
    #[serde(default)]
    pub table: TimeTableConfig,
}

impl Default for RateCounterConfig {
    fn default() -> Self {
        Self {
            period: DEFAULT_PERIOD,
            table: TimeTableConfig::default(),
        }
    }
}

impl TryFrom<RateCounterConfig> for RateCounter {
    type Error = LimitError;

    fn try_from(config: RateCounterConfig) -> Result<Self, Self::Error> {
        let table = RingBufferTimeTable::try_from(config.table)?;
        RateCounter::with_parts(config.period, table, Default::default())
    }
}

/// Configuration for a [`TickLimit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickLimitConfig {
    /// Maximum ticks per window.
    pub amount: Amount,
    #[serde(default = "default_period")]
    pub period: Tick,
    #[serde(default)]
    pub table: TimeTableConfig,
}

impl Default for TickLimitConfig {
    fn default() -> Self {
        Self {
            amount: 1,
            period: DEFAULT_PERIOD,
            table: TimeTableConfig::default(),
        }
    }
}

impl TryFrom<TickLimitConfig> for TickLimit {
    type Error = LimitError;

    fn try_from(config: TickLimitConfig) -> Result<Self, Self::Error> {
        let table = RingBufferTimeTable::try_from(config.table)?;
        TickLimit::with_parts(config.amount, config.period, table, Default::default())
    }
}
