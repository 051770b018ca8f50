use core::cell::Cell;
use core::cmp::Ordering;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    Result, ShardedGenerator, ShardedId, TimeSource, generator::recover_from_drift,
};

/// A non-concurrent fixed-shard generator for single-threaded environments.
///
/// This generator is lightweight and fast, but **not thread-safe**: the
/// state sits in a [`Cell`], so the type is `!Sync` and the compiler rejects
/// sharing it across threads.
///
/// ## Recommended when
/// - A single thread (or one generator per thread, each with its own shard
///   identity) produces all ids
/// - You want the fastest generator
///
/// ## See also
/// - [`LockShardedGenerator`] for shared multi-threaded use
///
/// [`LockShardedGenerator`]: crate::LockShardedGenerator
pub struct BasicShardedGenerator<ID, T>
where
    ID: ShardedId,
    T: TimeSource,
{
    state: Cell<ID>,
    time: T,
}

impl<ID, T> BasicShardedGenerator<ID, T>
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
    /// layout's shard field. For split layouts, combine and validate the
    /// per-field identities first:
    ///
    /// ```
    /// use shardflake::{BasicShardedGenerator, CLUSTER_EPOCH, ClusterId, WallClock};
    ///
    /// # fn main() -> shardflake::Result<()> {
    /// let shard = ClusterId::shard_from_parts(0, 1)?;
    /// let clock = WallClock::with_epoch(CLUSTER_EPOCH);
    /// let generator = BasicShardedGenerator::<ClusterId, _>::new(shard, clock)?;
    /// let id = generator.next_id()?;
    /// assert_eq!(id.machine_id(), 1);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// [`Error::ShardOutOfRange`]: crate::Error::ShardOutOfRange
    pub fn new(shard: u64, time: T) -> Result<Self> {
        let shard = ID::checked_shard(shard)?;
        Ok(Self {
            state: Cell::new(ID::from_components(0, shard, 0)),
            time,
        })
    }

    /// Issues the next identifier.
    ///
    /// The clock read, comparison, and state update form one atomic step; a
    /// same-millisecond call advances the sequence, a sequence overflow
    /// waits for the next millisecond, and a backward clock jump within
    /// [`CLOCK_DRIFT_TOLERANCE_MS`] is waited out.
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
        let now = self.time.current_millis();
        let state = self.state.get();
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

        self.state.set(updated);
        Ok(updated)
    }
}

impl<ID, T> ShardedGenerator<ID, T> for BasicShardedGenerator<ID, T>
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
