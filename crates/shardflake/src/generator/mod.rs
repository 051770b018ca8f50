use crate::{Error, Result, TimeSource};

mod basic;
mod interface;
mod lock;
mod tag;

pub use basic::*;
pub use interface::*;
pub use lock::*;
pub use tag::*;

/// Largest backward clock jump, in milliseconds, that a generator waits out
/// instead of failing.
///
/// A regression of at most this many milliseconds stalls the failing call
/// (and, through the generator's lock, its peers) until the clock catches
/// up. Anything larger is surfaced as [`Error::ClockRegression`] and left to
/// the caller to escalate.
pub const CLOCK_DRIFT_TOLERANCE_MS: u64 = 3_000;

/// Handles an observed backward clock jump: waits out a drift within
/// [`CLOCK_DRIFT_TOLERANCE_MS`] and returns the caught-up reading, fails on
/// anything larger.
#[cold]
#[inline(never)]
pub(crate) fn recover_from_drift<T>(time: &T, now: u64, last: u64) -> Result<u64>
where
    T: TimeSource,
{
    let behind_ms = last - now;
    if behind_ms > CLOCK_DRIFT_TOLERANCE_MS {
        #[cfg(feature = "tracing")]
        tracing::warn!(behind_ms, "clock moved backwards; rejecting request");
        return Err(Error::ClockRegression {
            behind_ms,
            tolerance_ms: CLOCK_DRIFT_TOLERANCE_MS,
        });
    }
    Ok(time.wait_until_after(last))
}
