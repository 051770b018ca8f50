use core::cmp::Ordering;

use parking_lot::Mutex;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Result, ShardedGenerator, ShardedId, TimeSource, generator::recover_from_drift,
};

/// A lock-based fixed-shard generator for multi-threaded environments.
///
/// The generator state sits behind a [`Mutex`], so any number of threads may
/// call [`next_id`] on a shared instance; calls are fully serialized. Waits
/// (sequence overflow, tolerated clock drift) happen while the lock is held,
/// which intentionally stalls concurrent callers too: none of them could
/// produce an id for the stalled millisecond anyway, and the single lock
/// keeps the clock read, comparison, and state update atomic.
///
/// ## Recommended when
/// - Several threads share one generator instance (one shard identity per
///   process)
///
/// ## See also
/// - [`BasicShardedGenerator`] for single-threaded use
/// - [`LockTagGenerator`] for a shard field supplied per call
///
/// [`next_id`]: Self::next_id
/// [`BasicShardedGenerator`]: crate::BasicShardedGenerator
/// [`LockTagGenerator`]: crate::LockTagGenerator
#[derive(Debug)]
pub struct LockShardedGenerator<ID, T>
where
    ID: ShardedId,
    T: TimeSource,
{
    state: Mutex<ID>,
    time: T,
}

impl<ID, T> LockShardedGenerator<ID, T>
where
    ID: ShardedId,
    T: TimeSource,
{
    /// Creates a generator whose ids all carry `shard`, reading timestamps
    /// from `time`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShardOutOfRange`] if `shard` does not fit the
    /// layout's shard field.
    ///
    /// # Example
    ///
    /// ```
    /// use shardflake::{ClassicId, LockShardedGenerator, WallClock};
    ///
    /// # fn main() -> shardflake::Result<()> {
    /// let shard = ClassicId::shard_from_parts(0, 1)?;
    /// let generator = LockShardedGenerator::<ClassicId, _>::new(shard, WallClock::default())?;
    /// let id = generator.next_id()?;
    /// assert_eq!(id.datacenter_id(), 0);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// [`Error::ShardOutOfRange`]: crate::Error::ShardOutOfRange
    pub fn new(shard: u64, time: T) -> Result<Self> {
        let shard = ID::checked_shard(shard)?;
        Ok(Self {
            state: Mutex::new(ID::from_components(0, shard, 0)),
            time,
        })
    }

    /// Issues the next identifier.
    ///
    /// A same-millisecond call advances the sequence, a sequence overflow
    /// waits for the next millisecond, and a backward clock jump within
    /// [`CLOCK_DRIFT_TOLERANCE_MS`] is waited out — all inside the critical
    /// section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegression`] if the clock fell behind the last
    /// issued timestamp by more than the tolerance.
    ///
    /// [`CLOCK_DRIFT_TOLERANCE_MS`]: crate::CLOCK_DRIFT_TOLERANCE_MS
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self) -> Result<ID> {
        let mut state = self.state.lock();
        let now = self.time.current_millis();
        let last = state.timestamp();

        let updated = match now.cmp(&last) {
            Ordering::Equal => {
                if state.has_sequence_room() {
                    state.increment_sequence()
                } else {
                    state.rollover_to_timestamp(self.time.wait_until_after(last))
                }
            }
            Ordering::Greater => state.rollover_to_timestamp(now),
            Ordering::Less => {
                state.rollover_to_timestamp(recover_from_drift(&self.time, now, last)?)
            }
        };

        *state = updated;
        Ok(updated)
    }
}

impl<ID, T> ShardedGenerator<ID, T> for LockShardedGenerator<ID, T>
where
    ID: ShardedId,
    T: TimeSource,
{
    fn new(shard: u64, time: T) -> Result<Self> {
        Self::new(shard, time)
    }

    fn next_id(&self) -> Result<ID> {
        self.next_id()
    }
}
