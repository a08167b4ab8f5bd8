//! Concrete [`TimeTable`](crate::TimeTable) implementations.
//!
//! - **[`RingBufferTimeTable`]** - array-backed circular buffer that grows by doubling

pub mod ring_buffer_time_table;
pub use ring_buffer_time_table::Iter;
pub use ring_buffer_time_table::RingBufferTimeTable;
pub use ring_buffer_time_table::{DEFAULT_BUFFER_SIZE, DEFAULT_GROWTH_LIMIT};
