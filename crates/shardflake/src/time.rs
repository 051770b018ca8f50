use core::time::Duration;
use std::time::{SystemTime, UNIX_EPOCH};

/// Classic epoch: Thursday, November 4, 2010 01:42:54.657 UTC.
///
/// Used by the [`ClassicId`] and [`RegionId`] deployments.
///
/// [`ClassicId`]: crate::ClassicId
/// [`RegionId`]: crate::RegionId
pub const CLASSIC_EPOCH: Duration = Duration::from_millis(1_288_834_974_657);

/// Cluster epoch: Wednesday, October 11, 1989 00:00:00 UTC.
///
/// Used by the [`ClusterId`] deployment. A 41-bit millisecond delta keeps
/// ids unique for roughly 69 years past this point.
///
/// [`ClusterId`]: crate::ClusterId
pub const CLUSTER_EPOCH: Duration = Duration::from_millis(624_067_200_000);

/// A source of milliseconds elapsed since a configured epoch.
///
/// Implementations may be wall-clock backed (the default, [`WallClock`]) or
/// mocked in tests. A wall-clock source can be observed moving backwards
/// (NTP step, VM migration); the generators own the policy for that case.
///
/// # Example
///
/// ```
/// use shardflake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1234);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> u64;

    /// Polls the clock until the observed time is strictly greater than
    /// `last` and returns the first such reading.
    ///
    /// The wait is an active loop that yields the processor between polls.
    /// Progress depends on the clock actually advancing, so the wait is
    /// bounded by wall-clock time rather than by a fixed sleep duration; on
    /// the sequence-overflow path it lasts at most one millisecond.
    fn wait_until_after(&self, last: u64) -> u64 {
        loop {
            let now = self.current_millis();
            if now > last {
                return now;
            }
            std::thread::yield_now();
        }
    }
}

/// The default [`TimeSource`]: wall-clock milliseconds relative to an epoch.
///
/// Unlike a monotonic timer, this clock follows the system clock and can
/// therefore be observed moving backwards; the generators wait out small
/// regressions and reject large ones, so the rollback contract is exercised
/// against real deployments.
#[derive(Clone, Copy, Debug)]
pub struct WallClock {
    epoch: Duration,
}

impl WallClock {
    /// Creates a clock whose zero point is `epoch`, given as a duration
    /// since 1970-01-01 UTC.
    ///
    /// All generator instances sharing an id space must use the same epoch;
    /// changing it invalidates comparability with previously issued ids.
    #[must_use]
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self { epoch }
    }

    /// The epoch this clock measures from, in milliseconds since the Unix
    /// epoch.
    #[must_use]
    pub const fn epoch_millis(&self) -> u64 {
        self.epoch.as_millis() as u64
    }
}

impl Default for WallClock {
    /// A wall clock aligned to [`CLASSIC_EPOCH`].
    fn default() -> Self {
        Self::with_epoch(CLASSIC_EPOCH)
    }
}

impl TimeSource for WallClock {
    /// Milliseconds since the configured epoch, clamped to zero if the
    /// system clock reads earlier than the epoch.
    fn current_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH + self.epoch)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}
