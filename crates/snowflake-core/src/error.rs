use jiff::Timestamp;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by generator construction and ID generation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid datacenter id {datacenter_id}; expected 0..={max}")]
    InvalidDatacenterId { datacenter_id: u8, max: u8 },
    #[error("invalid worker id {worker_id}; expected 0..={max}")]
    InvalidWorkerId { worker_id: u8, max: u8 },
    #[error("clock moved backwards, refusing to generate id: last={last}ms, now={now}ms")]
    ClockMovedBackwards { last: i64, now: i64 },
    #[error("cannot resolve a datacenter id: {0}")]
    NodeIdUnavailable(String),
    #[error("epoch is ahead of current clock time: epoch={epoch}, now={now}")]
    EpochAhead { epoch: Timestamp, now: Timestamp },
    #[error("overtime limit")]
    OverTimeLimit,
    #[error("generator state lock is poisoned")]
    StatePoisoned,
}
