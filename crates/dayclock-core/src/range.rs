//! Contiguous windows of whole local calendar days.
//!
//! Day arithmetic happens on local calendar dates, never by subtracting
//! multiples of 86400 seconds from an instant, so a window that crosses a DST
//! transition still covers whole local days.

use chrono::{DateTime, Days, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::bounds::local_days_range;
use crate::env::Clock;
use crate::error::{DayclockError, Result};
use crate::models::{DateRange, DayKey};
use crate::parse::parse_local_date;

/// Compute the window for the last `n` days ending today in `tz`.
///
/// `end` is the last millisecond of the local date containing `now`. `start` is
/// local midnight `n` calendar days before that date, so a 7-day window on
/// 2024-01-15 starts at 2024-01-08 00:00 local.
///
/// # Errors
///
/// Returns [`DayclockError::InvalidRange`] when `n <= 0`.
///
/// # Examples
///
/// ```
/// use dayclock_core::range::last_n_days_range;
/// use dayclock_core::tz::parse_tz;
/// use chrono::{TimeZone, Utc};
///
/// let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
/// let range = last_n_days_range(7, parse_tz("Europe/Warsaw").unwrap(), now).unwrap();
///
/// assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 1, 7, 23, 0, 0).unwrap());
/// ```
pub fn last_n_days_range(n: i64, tz: Tz, now: DateTime<Utc>) -> Result<DateRange> {
    if n <= 0 {
        return Err(DayclockError::InvalidRange(format!(
            "day count must be positive, got {}",
            n
        )));
    }

    let today = now.with_timezone(&tz).date_naive();
    let first = today
        .checked_sub_days(Days::new(n.unsigned_abs()))
        .ok_or_else(|| {
            DayclockError::InvalidRange(format!("{} days before {} is out of range", n, today))
        })?;

    debug!(n, %tz, %first, %today, "building last-n-days range");
    local_days_range(first, today, tz)
}

/// [`last_n_days_range`] with "now" taken from a [`Clock`].
pub fn last_n_days(n: i64, tz: Tz, clock: &dyn Clock) -> Result<DateRange> {
    last_n_days_range(n, tz, clock.now())
}

/// The range of a single local day given as `dd/MM/yyyy` or `yyyy-MM-dd`.
pub fn range_for_date(input: &str, tz: Tz) -> Result<DateRange> {
    let date = parse_local_date(input)?;
    local_days_range(date, date, tz)
}

/// Inclusive window from the start of local date `from` to the end of local
/// date `to`.
pub fn range_between_dates(from: NaiveDate, to: NaiveDate, tz: Tz) -> Result<DateRange> {
    if from > to {
        return Err(DayclockError::InvalidRange(format!(
            "from date {} is after to date {}",
            from, to
        )));
    }
    local_days_range(from, to, tz)
}

/// Whether `instant` falls inside `range`, both bounds included.
pub fn is_date_in_range(instant: DateTime<Utc>, range: &DateRange) -> bool {
    range.contains(instant)
}

/// Every local day touched by `range` in ascending order.
pub fn days_in_range(range: &DateRange, tz: Tz) -> Vec<DayKey> {
    let first = range.start.with_timezone(&tz).date_naive();
    let last = range.end.with_timezone(&tz).date_naive();

    first
        .iter_days()
        .take_while(|date| *date <= last)
        .map(DayKey::new)
        .collect()
}

/// Today's local day in `tz`.
pub fn today(tz: Tz, clock: &dyn Clock) -> DayKey {
    DayKey::new(clock.now().with_timezone(&tz).date_naive())
}
