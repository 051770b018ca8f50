use core::marker::PhantomData;
use core::time::Duration;

use chrono::{DateTime, Months, NaiveDate, NaiveTime, Utc};

use crate::{Error, Result, ShardedId};

/// The open interval of identifiers producible during a time window.
///
/// Both bounds are exclusive: they bracket, but never equal, an id actually
/// generated inside the window. This makes them directly usable as scan
/// bounds in a store keyed by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdRange<ID> {
    lower_exclusive: ID,
    upper_exclusive: ID,
}

impl<ID> IdRange<ID>
where
    ID: ShardedId,
{
    /// The exclusive lower bound: every id generated inside the window is
    /// strictly greater.
    #[must_use]
    pub fn lower_exclusive(&self) -> ID {
        self.lower_exclusive
    }

    /// The exclusive upper bound: every id generated inside the window is
    /// strictly smaller.
    #[must_use]
    pub fn upper_exclusive(&self) -> ID {
        self.upper_exclusive
    }

    /// Returns `true` if `id` could have been generated inside the window.
    #[must_use]
    pub fn contains(&self, id: ID) -> bool {
        self.lower_exclusive < id && id < self.upper_exclusive
    }
}

/// Derives id-interval bounds for calendar periods and explicit time
/// windows, using only a layout and an epoch.
///
/// The calculator is pure: it needs no access to any generator state and
/// may be shared freely across threads. The epoch must match the one used
/// by the generators that issued the ids being bracketed, and all calendar
/// arithmetic is UTC with 1-based months.
///
/// # Example
///
/// ```
/// use shardflake::{CLASSIC_EPOCH, RangeCalculator, RegionId};
///
/// # fn main() -> shardflake::Result<()> {
/// let calculator = RangeCalculator::<RegionId>::with_epoch(CLASSIC_EPOCH);
/// let range = calculator.for_day(2016, 11, 24)?;
/// assert!(range.lower_exclusive() < range.upper_exclusive());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RangeCalculator<ID> {
    epoch_ms: i64,
    _layout: PhantomData<ID>,
}

impl<ID> RangeCalculator<ID>
where
    ID: ShardedId,
{
    /// Creates a calculator for a deployment whose ids measure time from
    /// `epoch`, given as a duration since 1970-01-01 UTC.
    #[must_use]
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self {
            epoch_ms: epoch.as_millis() as i64,
            _layout: PhantomData,
        }
    }

    /// Bounds for one calendar month.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDate`] for a nonexistent month and
    /// [`Error::WindowBeforeEpoch`] if the month starts at or before the
    /// epoch.
    pub fn for_month(&self, year: i32, month: u32) -> Result<IdRange<ID>> {
        let start = first_of_month(year, month)?;
        let end = start
            .checked_add_months(Months::new(1))
            .ok_or(Error::InvalidDate {
                year,
                month,
                day: 1,
            })?;
        self.bracket(utc_midnight_millis(start), utc_midnight_millis(end))
    }

    /// Bounds for one calendar day.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDate`] for a nonexistent date and
    /// [`Error::WindowBeforeEpoch`] if the day starts at or before the
    /// epoch.
    pub fn for_day(&self, year: i32, month: u32, day: u32) -> Result<IdRange<ID>> {
        let start = NaiveDate::from_ymd_opt(year, month, day).ok_or(Error::InvalidDate {
            year,
            month,
            day,
        })?;
        let end = start.succ_opt().ok_or(Error::InvalidDate { year, month, day })?;
        self.bracket(utc_midnight_millis(start), utc_midnight_millis(end))
    }

    /// Bounds for the window starting at `start` and spanning `duration_ms`
    /// milliseconds (inclusive of the millisecond the window ends on).
    ///
    /// # Errors
    ///
    /// Returns [`Error::WindowBeforeEpoch`] if the window starts at or
    /// before the epoch.
    pub fn for_window(&self, start: DateTime<Utc>, duration_ms: u64) -> Result<IdRange<ID>> {
        let start_ms = start.timestamp_millis();
        self.bracket(start_ms, start_ms + duration_ms as i64 + 1)
    }

    /// Bounds for the window starting at `start` and spanning `seconds`
    /// whole seconds.
    ///
    /// # Errors
    ///
    /// Same as [`Self::for_window`].
    pub fn for_window_secs(&self, start: DateTime<Utc>, seconds: u64) -> Result<IdRange<ID>> {
        self.for_window(start, seconds * 1_000)
    }

    fn bracket(&self, start_utc_ms: i64, end_utc_ms: i64) -> Result<IdRange<ID>> {
        let shift = ID::SHARD_BITS + ID::SEQUENCE_BITS;
        let start_delta = self.delta(start_utc_ms)?;
        let end_delta = self.delta(end_utc_ms)?;
        debug_assert!(end_delta <= ID::max_timestamp(), "window past layout lifetime");

        // The highest value one timestamp unit before the window opens:
        // every in-window id carries a later timestamp and compares greater.
        let lower = ((start_delta - 1) << shift) | ID::max_sequence();
        // The lowest value at the first instant past the window: every
        // in-window id carries an earlier timestamp and compares smaller.
        let upper = end_delta << shift;

        Ok(IdRange {
            lower_exclusive: ID::from_raw(lower),
            upper_exclusive: ID::from_raw(upper),
        })
    }

    /// Milliseconds since the configured epoch; the window must start at
    /// least one millisecond after it so an exclusive lower bound exists.
    fn delta(&self, utc_ms: i64) -> Result<u64> {
        let delta = utc_ms - self.epoch_ms;
        if delta < 1 {
            return Err(Error::WindowBeforeEpoch);
        }
        Ok(delta as u64)
    }
}

fn utc_midnight_millis(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

fn first_of_month(year: i32, month: u32) -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1).ok_or(Error::InvalidDate {
        year,
        month,
        day: 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CLASSIC_EPOCH, RegionId};
    use chrono::TimeZone;

    const DAY_MS: u64 = 86_400_000;

    // 2016-11-24T00:00:00Z is 1_479_945_600_000 ms since the Unix epoch;
    // minus the classic epoch (1_288_834_974_657 ms) leaves this delta.
    const NOV_24_DELTA: u64 = 191_110_625_343;

    fn calculator() -> RangeCalculator<RegionId> {
        RangeCalculator::with_epoch(CLASSIC_EPOCH)
    }

    #[test]
    fn day_bounds_bracket_exactly_that_day() {
        let range = calculator().for_day(2016, 11, 24).unwrap();

        assert_eq!(
            range.lower_exclusive().to_raw(),
            ((NOV_24_DELTA - 1) << 22) | 0xfff
        );
        assert_eq!(
            range.upper_exclusive().to_raw(),
            (NOV_24_DELTA + DAY_MS) << 22
        );

        // The first and last producible ids of the day fall strictly inside.
        let first = RegionId::from(NOV_24_DELTA, 0, 0);
        let last = RegionId::from(
            NOV_24_DELTA + DAY_MS - 1,
            RegionId::max_region(),
            RegionId::max_sequence(),
        );
        assert!(range.contains(first));
        assert!(range.contains(last));

        // The previous day's final id sits on the lower bound, and the next
        // day's first id sits on the upper bound; neither is inside.
        let day_before = RegionId::from(NOV_24_DELTA - 1, 0, RegionId::max_sequence());
        assert_eq!(day_before, range.lower_exclusive());
        assert!(!range.contains(day_before));

        let day_after = RegionId::from(NOV_24_DELTA + DAY_MS, 0, 0);
        assert_eq!(day_after, range.upper_exclusive());
        assert!(!range.contains(day_after));
    }

    #[test]
    fn month_bounds_cover_every_day() {
        let month = calculator().for_month(2016, 11).unwrap();
        let first_day = calculator().for_day(2016, 11, 1).unwrap();
        let last_day = calculator().for_day(2016, 11, 30).unwrap();

        assert_eq!(month.lower_exclusive(), first_day.lower_exclusive());
        assert_eq!(month.upper_exclusive(), last_day.upper_exclusive());

        let mid_month = RegionId::from(NOV_24_DELTA + 1_000, 37, 12);
        assert!(month.contains(mid_month));
    }

    #[test]
    fn month_rolls_over_year_end() {
        let december = calculator().for_month(2016, 12).unwrap();
        let january_first = calculator().for_day(2017, 1, 1).unwrap();

        assert_eq!(
            december.upper_exclusive().timestamp(),
            january_first.lower_exclusive().timestamp() + 1
        );
    }

    #[test]
    fn window_bounds_match_window_arithmetic() {
        let start = Utc.with_ymd_and_hms(2016, 11, 24, 12, 0, 0).unwrap();
        let start_delta = NOV_24_DELTA + 12 * 3_600_000;
        let range = calculator().for_window(start, 5_000).unwrap();

        assert_eq!(
            range.lower_exclusive().to_raw(),
            ((start_delta - 1) << 22) | 0xfff
        );
        assert_eq!(
            range.upper_exclusive().to_raw(),
            (start_delta + 5_001) << 22
        );

        assert!(range.contains(RegionId::from(start_delta, 5, 0)));
        assert!(range.contains(RegionId::from(
            start_delta + 5_000,
            RegionId::max_region(),
            RegionId::max_sequence(),
        )));
    }

    #[test]
    fn window_secs_delegates_to_millis() {
        let start = Utc.with_ymd_and_hms(2016, 11, 24, 12, 0, 0).unwrap();
        assert_eq!(
            calculator().for_window_secs(start, 5).unwrap(),
            calculator().for_window(start, 5_000).unwrap()
        );
    }

    #[test]
    fn invalid_dates_are_rejected() {
        assert_eq!(
            calculator().for_day(2016, 13, 1).unwrap_err(),
            Error::InvalidDate {
                year: 2016,
                month: 13,
                day: 1
            }
        );
        assert_eq!(
            calculator().for_day(2017, 2, 29).unwrap_err(),
            Error::InvalidDate {
                year: 2017,
                month: 2,
                day: 29
            }
        );
        // 2016 was a leap year.
        assert!(calculator().for_day(2016, 2, 29).is_ok());
    }

    #[test]
    fn window_before_epoch_is_rejected() {
        let start = Utc.with_ymd_and_hms(2009, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            calculator().for_window(start, 1_000).unwrap_err(),
            Error::WindowBeforeEpoch
        );
    }
}
