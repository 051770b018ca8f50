use thiserror::Error;

/// Convenience alias for fallible `shardflake` operations.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors this crate can produce.
///
/// Construction-time failures ([`Error::ShardOutOfRange`],
/// [`Error::InvalidDate`], [`Error::WindowBeforeEpoch`]) are permanent:
/// retrying with the same inputs cannot succeed. [`Error::ClockRegression`]
/// is fatal for the failing call only; the crate never retries it
/// internally, leaving escalation policy to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A shard identity does not fit the bit field configured for it.
    #[error("{field} {value} can't be greater than {max}")]
    ShardOutOfRange {
        /// Which field was out of range (e.g. `"datacenter id"`).
        field: &'static str,
        /// The rejected value.
        value: u64,
        /// The largest value the field can hold.
        max: u64,
    },

    /// The clock fell behind the last issued timestamp by more than the
    /// tolerated drift.
    #[error(
        "clock moved backwards; refusing to generate id for {behind_ms} ms \
         (tolerance {tolerance_ms} ms)"
    )]
    ClockRegression {
        /// How far behind the last issued timestamp the clock was observed.
        behind_ms: u64,
        /// The drift the generator would have waited out instead of failing.
        tolerance_ms: u64,
    },

    /// The requested calendar period does not exist.
    #[error("no such calendar date: {year:04}-{month:02}-{day:02}")]
    InvalidDate {
        year: i32,
        month: u32,
        day: u32,
    },

    /// The requested window starts at or before the configured epoch, so no
    /// exclusive lower bound exists for it.
    #[error("window starts at or before the configured epoch")]
    WindowBeforeEpoch,
}
