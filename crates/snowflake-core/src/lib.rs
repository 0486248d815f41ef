//! Coordination-free, time-ordered 64-bit identifiers.
//!
//! Each id packs, from the most significant bit down, a 41-bit millisecond
//! offset from a fixed epoch, a 5-bit datacenter id, a 5-bit worker id and a
//! 12-bit per-millisecond sequence. Generators never talk to each other;
//! uniqueness across a fleet rests on every running generator having a
//! distinct `(datacenter_id, worker_id)` pair.

mod clock;
pub mod error;
mod generator;
pub mod layout;
pub mod node;

pub use clock::{Clock, SystemClock};
pub use error::{Error, Result};
pub use generator::{Snowflake, SnowflakeSettings, TWITTER_EPOCH};
pub use layout::{extract_timestamp, SnowflakeId};
pub use node::NodeIdResolver;
