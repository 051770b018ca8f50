use core::cmp::Ordering;

use parking_lot::Mutex;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{Result, ShardedId, TimeSource, generator::recover_from_drift};

struct TagState<ID> {
    id: ID,
    last_tag: u64,
}

/// A lock-based generator whose shard field is supplied per call.
///
/// Instead of a fixed shard identity, each call passes a signed logical
/// `tag` (a user id, a tenant key); the id's shard field is filled with the
/// tag wrapped into the field's width. Negative tags are normalized by
/// negation, so `tag` and `-tag` land in the same shard.
///
/// When a call repeats the previous call's tag, the sequence advances a
/// second time, so two consecutive ids issued for the same logical shard
/// are never sequence-adjacent. Repeated-tag bursts therefore consume
/// sequence space twice as fast; uniqueness and overflow handling are
/// otherwise identical to [`LockShardedGenerator`].
///
/// The timestamp/rollback/overflow state machine matches the fixed-shard
/// generators: same critical section, same [`CLOCK_DRIFT_TOLERANCE_MS`].
///
/// [`LockShardedGenerator`]: crate::LockShardedGenerator
/// [`CLOCK_DRIFT_TOLERANCE_MS`]: crate::CLOCK_DRIFT_TOLERANCE_MS
pub struct LockTagGenerator<ID, T>
where
    ID: ShardedId,
    T: TimeSource,
{
    state: Mutex<TagState<ID>>,
    time: T,
}

impl<ID, T> LockTagGenerator<ID, T>
where
    ID: ShardedId,
    T: TimeSource,
{
    /// Creates a tag-sharded generator reading timestamps from `time`.
    ///
    /// There is no shard identity to validate: tags are wrapped into the
    /// shard field at call time, never rejected.
    pub fn new(time: T) -> Self {
        Self {
            state: Mutex::new(TagState {
                id: ID::from_components(0, 0, 0),
                last_tag: 1,
            }),
            time,
        }
    }

    /// Issues the next identifier for the given logical shard tag.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegression`] if the clock fell behind the last
    /// issued timestamp by more than the tolerance.
    ///
    /// # Example
    ///
    /// ```
    /// use shardflake::{LockTagGenerator, RegionId, WallClock};
    ///
    /// # fn main() -> shardflake::Result<()> {
    /// let generator = LockTagGenerator::<RegionId, _>::new(WallClock::default());
    /// // The tag wraps into the 10-bit region field: 1537 % 1024 == 513.
    /// let id = generator.next_id(1_537)?;
    /// assert_eq!(id.region(), 513);
    /// # Ok(())
    /// # }
    /// ```
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn next_id(&self, tag: i64) -> Result<ID> {
        let tag = tag.unsigned_abs();

        let mut state = self.state.lock();
        let now = self.time.current_millis();
        let last = state.id.timestamp();

        let (mut timestamp, mut sequence) = match now.cmp(&last) {
            Ordering::Equal => {
                if state.id.has_sequence_room() {
                    (last, state.id.sequence() + 1)
                } else {
                    (self.time.wait_until_after(last), 0)
                }
            }
            Ordering::Greater => (now, 0),
            Ordering::Less => (recover_from_drift(&self.time, now, last)?, 0),
        };

        // Same shard as the previous id: advance once more so the two are
        // not sequence-adjacent.
        if tag == state.last_tag {
            if sequence < ID::max_sequence() {
                sequence += 1;
            } else {
                timestamp = self.time.wait_until_after(timestamp);
                sequence = 0;
            }
        }
        state.last_tag = tag;

        let id = ID::from_components(timestamp, tag & ID::max_shard(), sequence);
        state.id = id;
        Ok(id)
    }
}
