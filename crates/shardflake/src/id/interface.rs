use crate::{Error, Result};
use core::fmt;
use core::hash::Hash;

/// A packed 64-bit identifier with timestamp, shard, and sequence fields.
///
/// Implementations are generated by [`define_sharded_id!`] and differ only
/// in how the 64 bits are partitioned. Fields are laid out from most to
/// least significant as `reserved | timestamp | shard | sequence`, so the
/// derived `Ord` on the raw value sorts ids by `(timestamp, shard,
/// sequence)`. The reserved (sign) bit is zero for every in-range timestamp,
/// which makes the raw value losslessly representable as a non-negative
/// `i64`.
///
/// [`define_sharded_id!`]: crate::define_sharded_id
pub trait ShardedId:
    Copy + Clone + fmt::Debug + fmt::Display + PartialEq + Eq + PartialOrd + Ord + Hash
{
    /// Width of the shard field(s), combined, in bits.
    const SHARD_BITS: u32;

    /// Width of the per-millisecond sequence field in bits.
    const SEQUENCE_BITS: u32;

    /// Extracts the timestamp delta (milliseconds since the deployment
    /// epoch).
    fn timestamp(&self) -> u64;

    /// Extracts the combined shard field value.
    fn shard(&self) -> u64;

    /// Extracts the per-millisecond sequence.
    fn sequence(&self) -> u64;

    /// Largest encodable timestamp delta.
    fn max_timestamp() -> u64;

    /// Largest encodable combined shard value.
    fn max_shard() -> u64;

    /// Largest encodable sequence value.
    fn max_sequence() -> u64;

    /// Packs the given components. Each value is masked into its field.
    #[must_use]
    fn from_components(timestamp: u64, shard: u64, sequence: u64) -> Self;

    /// The raw packed value.
    fn to_raw(&self) -> u64;

    /// Reinterprets a raw packed value.
    fn from_raw(raw: u64) -> Self;

    /// The identifier as a signed 64-bit integer (always non-negative).
    fn to_i64(&self) -> i64 {
        self.to_raw() as i64
    }

    /// Validates a combined shard value against this layout.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ShardOutOfRange`] if `shard` exceeds
    /// [`Self::max_shard`].
    fn checked_shard(shard: u64) -> Result<u64> {
        if shard > Self::max_shard() {
            return Err(Error::ShardOutOfRange {
                field: "shard id",
                value: shard,
                max: Self::max_shard(),
            });
        }
        Ok(shard)
    }

    /// Returns `true` if another id can still be issued in the current
    /// millisecond.
    fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::max_sequence()
    }

    /// The same id with the sequence advanced by one.
    #[must_use]
    fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.shard(), self.sequence() + 1)
    }

    /// A fresh id at `timestamp` with the sequence reset to zero.
    #[must_use]
    fn rollover_to_timestamp(&self, timestamp: u64) -> Self {
        Self::from_components(timestamp, self.shard(), 0)
    }
}
