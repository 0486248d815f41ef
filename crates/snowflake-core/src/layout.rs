use jiff::Timestamp;
use modular_bitfield::prelude::*;
use std::fmt;

pub const SEQUENCE_BITS: u32 = 12;
pub const WORKER_ID_BITS: u32 = 5;
pub const DATACENTER_ID_BITS: u32 = 5;
pub const TIMESTAMP_BITS: u32 = 41;

pub const WORKER_ID_SHIFT: u32 = SEQUENCE_BITS;
pub const DATACENTER_ID_SHIFT: u32 = SEQUENCE_BITS + WORKER_ID_BITS;
pub const TIMESTAMP_SHIFT: u32 = SEQUENCE_BITS + WORKER_ID_BITS + DATACENTER_ID_BITS;

pub const MAX_SEQUENCE: u16 = (1 << SEQUENCE_BITS) - 1;
pub const MAX_WORKER_ID: u8 = (1 << WORKER_ID_BITS) - 1;
pub const MAX_DATACENTER_ID: u8 = (1 << DATACENTER_ID_BITS) - 1;
pub const MAX_TIMESTAMP: u64 = (1 << TIMESTAMP_BITS) - 1;

/// A decoded 64-bit snowflake.
///
/// Fields are listed least significant first, so the packed value reads
/// `timestamp | datacenter_id | worker_id | sequence` from the top bit down.
/// The most significant bit is never set, which keeps ids positive when they
/// are stored as signed 64-bit integers.
#[bitfield]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SnowflakeId {
    /// 12 bits for the per-millisecond sequence.
    pub sequence: B12,
    /// 5 bits for the worker id.
    pub worker_id: B5,
    /// 5 bits for the datacenter id.
    pub datacenter_id: B5,
    /// 41 bits for milliseconds since the custom epoch.
    pub timestamp: B41,
    #[skip]
    __: B1,
}

impl SnowflakeId {
    /// Splits a raw id into its fields. The sign bit is discarded.
    pub fn decode(id: u64) -> Self {
        Self::from_bytes(id.to_le_bytes())
    }

    pub fn as_u64(&self) -> u64 {
        u64::from_le_bytes(self.into_bytes())
    }
}

impl From<SnowflakeId> for u64 {
    fn from(id: SnowflakeId) -> Self {
        id.as_u64()
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("timestamp", &self.timestamp())
            .field("datacenter_id", &self.datacenter_id())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

/// Packs the id fields into a single integer.
///
/// Callers must keep every field inside its bit width; out of range values
/// bleed into the neighbouring fields.
pub fn pack(timestamp_offset: u64, datacenter_id: u8, worker_id: u8, sequence: u16) -> u64 {
    (timestamp_offset << TIMESTAMP_SHIFT)
        | (u64::from(datacenter_id) << DATACENTER_ID_SHIFT)
        | (u64::from(worker_id) << WORKER_ID_SHIFT)
        | u64::from(sequence)
}

/// Returns the unix time in milliseconds of the bucket `id` was minted in.
///
/// Defined for every input: no range checks are made on `id`.
pub fn extract_timestamp(id: u64, epoch: Timestamp) -> i64 {
    ((id >> TIMESTAMP_SHIFT) as i64).wrapping_add(epoch.as_millisecond())
}
