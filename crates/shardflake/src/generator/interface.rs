use crate::{Result, ShardedId, TimeSource};

/// A minimal interface over the fixed-shard generator flavors.
pub trait ShardedGenerator<ID, T>
where
    ID: ShardedId,
    T: TimeSource,
{
    /// Creates a generator whose ids all carry `shard`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShardOutOfRange`] if `shard` does not fit the
    /// layout's shard field; no id is ever generated from an invalid
    /// configuration.
    ///
    /// [`Error::ShardOutOfRange`]: crate::Error::ShardOutOfRange
    fn new(shard: u64, time: T) -> Result<Self>
    where
        Self: Sized;

    /// Issues the next identifier, waiting out millisecond-boundary stalls
    /// and tolerated clock drift.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ClockRegression`] if the clock fell behind the last
    /// issued timestamp by more than [`CLOCK_DRIFT_TOLERANCE_MS`].
    ///
    /// [`Error::ClockRegression`]: crate::Error::ClockRegression
    /// [`CLOCK_DRIFT_TOLERANCE_MS`]: crate::CLOCK_DRIFT_TOLERANCE_MS
    fn next_id(&self) -> Result<ID>;
}
