use crate::{
    clock::{Clock, SystemClock},
    error::{Error, Result},
    layout::{self, MAX_DATACENTER_ID, MAX_SEQUENCE, MAX_TIMESTAMP, MAX_WORKER_ID},
    node::{self, NodeIdResolver},
};
use jiff::Timestamp;
use std::sync::Mutex;
use tracing::{debug, warn};
use typed_builder::TypedBuilder;

/// 2010-11-04T01:42:54.657Z, the epoch of Twitter's original snowflake.
pub const TWITTER_EPOCH: Timestamp = Timestamp::constant(1_288_834_974, 657_000_000);

/// Configures a Snowflake generator instance.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct SnowflakeSettings {
    /// Datacenter index in the range `[0, 31]`.
    pub datacenter_id: u8,
    /// Worker index in the range `[0, 31]`.
    pub worker_id: u8,
    /// Zero point of the 41-bit millisecond timestamp field.
    ///
    /// Every generator sharing an id space must use the same epoch, and it
    /// must never change once ids have been issued.
    #[builder(default = TWITTER_EPOCH)]
    pub epoch: Timestamp,
}

#[derive(Debug, Default)]
struct GeneratorState {
    /// Milliseconds since the unix epoch of the last issued id.
    last_timestamp: Option<i64>,
    sequence: u16,
}

/// Snowflake ID generator.
///
/// Calls on one instance are serialized by an internal mutex. Instances are
/// independent of each other; distinct `(datacenter_id, worker_id)` pairs
/// are what keep their ids apart.
pub struct Snowflake<C: Clock = SystemClock> {
    epoch: Timestamp,
    datacenter_id: u8,
    worker_id: u8,
    clock: C,
    state: Mutex<GeneratorState>,
}

impl Snowflake<SystemClock> {
    /// Creates a generator for an explicitly assigned node.
    pub fn new(datacenter_id: u8, worker_id: u8) -> Result<Self> {
        Self::with_settings(
            SnowflakeSettings::builder()
                .datacenter_id(datacenter_id)
                .worker_id(worker_id)
                .build(),
        )
    }

    /// Creates a generator whose datacenter id is derived from the host.
    ///
    /// See [`node::default_resolver`]. The derived id is best-effort and may
    /// collide with another host's.
    pub fn with_worker_id(worker_id: u8) -> Result<Self> {
        Self::with_resolver(worker_id, &node::default_resolver())
    }

    /// Creates a generator whose datacenter id comes from `resolver`.
    pub fn with_resolver<R: NodeIdResolver>(worker_id: u8, resolver: &R) -> Result<Self> {
        let datacenter_id = resolver.resolve()?;
        Self::new(datacenter_id, worker_id)
    }

    /// Creates a generator backed by the real system clock.
    pub fn with_settings(settings: SnowflakeSettings) -> Result<Self> {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> Snowflake<C> {
    /// Creates a generator reading time from `clock`.
    pub fn with_clock(settings: SnowflakeSettings, clock: C) -> Result<Self> {
        if settings.datacenter_id > MAX_DATACENTER_ID {
            return Err(Error::InvalidDatacenterId {
                datacenter_id: settings.datacenter_id,
                max: MAX_DATACENTER_ID,
            });
        }
        if settings.worker_id > MAX_WORKER_ID {
            return Err(Error::InvalidWorkerId {
                worker_id: settings.worker_id,
                max: MAX_WORKER_ID,
            });
        }

        let now = clock.now();
        if settings.epoch > now {
            return Err(Error::EpochAhead {
                epoch: settings.epoch,
                now,
            });
        }

        Ok(Self {
            epoch: settings.epoch,
            datacenter_id: settings.datacenter_id,
            worker_id: settings.worker_id,
            clock,
            state: Mutex::new(GeneratorState::default()),
        })
    }

    pub fn datacenter_id(&self) -> u8 {
        self.datacenter_id
    }

    pub fn worker_id(&self) -> u8 {
        self.worker_id
    }

    pub fn epoch(&self) -> Timestamp {
        self.epoch
    }

    /// Generates the next unique id.
    ///
    /// - a repeat millisecond increments the sequence
    /// - an exhausted sequence waits for the next millisecond
    /// - a clock that moved backwards fails the call; nothing is retried
    pub fn next_id(&self) -> Result<u64> {
        let mut state = self.state.lock().map_err(|_| Error::StatePoisoned)?;

        let now = self.clock.now();

        // state is written back only after every check below has passed
        let (now, sequence) = match state.last_timestamp {
            Some(last) if now.as_millisecond() < last => {
                return Err(clock_moved_backwards(last, now));
            }
            Some(last) if now.as_millisecond() == last => {
                let sequence = (state.sequence + 1) & MAX_SEQUENCE;
                if sequence == 0 {
                    debug!(
                        last_timestamp = last,
                        "sequence exhausted, waiting for next millisecond"
                    );
                    self.clock.wait_past(last);
                    let now = self.clock.now();
                    if now.as_millisecond() <= last {
                        return Err(clock_moved_backwards(last, now));
                    }
                    (now, 0)
                } else {
                    (now, sequence)
                }
            }
            _ => (now, 0),
        };

        let offset = now.as_millisecond() - self.epoch.as_millisecond();
        if offset < 0 {
            return Err(Error::EpochAhead {
                epoch: self.epoch,
                now,
            });
        }
        if offset as u64 > MAX_TIMESTAMP {
            return Err(Error::OverTimeLimit);
        }

        state.last_timestamp = Some(now.as_millisecond());
        state.sequence = sequence;

        Ok(layout::pack(
            offset as u64,
            self.datacenter_id,
            self.worker_id,
            sequence,
        ))
    }

    /// Returns the unix time in milliseconds at which `id` was minted.
    ///
    /// Only the millisecond is recovered; the order of ids within it is not.
    pub fn extract_timestamp(&self, id: u64) -> i64 {
        layout::extract_timestamp(id, self.epoch)
    }
}

fn clock_moved_backwards(last: i64, now: Timestamp) -> Error {
    let now = now.as_millisecond();
    warn!(
        last_timestamp = last,
        now,
        drift_ms = last - now,
        "clock moved backwards, refusing to generate id"
    );
    Error::ClockMovedBackwards { last, now }
}
