use jiff::Timestamp;

pub trait Clock: Send + Sync {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
    /// Block until the clock reads a millisecond strictly after `millisecond`.
    fn wait_past(&self, millisecond: i64);
}

/// Wall clock backed by [`Timestamp::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn wait_past(&self, millisecond: i64) {
        // The gap is below one millisecond, far shorter than any sleep
        // granularity, so spin and hand the core back between reads.
        while Timestamp::now().as_millisecond() <= millisecond {
            std::thread::yield_now();
        }
    }
}
