//! Local day and week boundaries.
//!
//! Boundaries are computed in local calendar space and each one is converted
//! to UTC independently, so a day is 23 hours long on a spring-forward date
//! and 25 hours long on a fall-back date.

use chrono::{DateTime, Datelike, Days, Duration, NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::{DayclockError, Result};
use crate::models::{DateRange, WeekStart};
use crate::tz::local_to_utc;

/// Compute the local calendar day containing `instant` as an inclusive range.
///
/// `start` is the first instant of the day (local `00:00:00.000`, or the first
/// valid time after it when midnight falls in a gap). `end` is one millisecond
/// before the next local day begins, which reads as `23:59:59.999`.
///
/// On the first and last dates chrono can represent, a boundary that has no
/// UTC instant is clamped to `DateTime::<Utc>::MIN_UTC` or
/// `DateTime::<Utc>::MAX_UTC`, so the range still contains `instant`.
///
/// # Examples
///
/// ```
/// use dayclock_core::bounds::day_bounds;
/// use dayclock_core::tz::parse_tz;
/// use chrono::{TimeZone, Utc};
///
/// let instant = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
/// let range = day_bounds(instant, parse_tz("UTC").unwrap());
///
/// assert_eq!(range.start, Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap());
/// assert_eq!(range.end.to_rfc3339(), "2024-01-15T23:59:59.999+00:00");
/// ```
pub fn day_bounds(instant: DateTime<Utc>, tz: Tz) -> DateRange {
    let date = instant.with_timezone(&tz).date_naive();
    if let Ok(range) = local_days_range(date, date, tz) {
        return range;
    }

    let start = local_midnight_to_utc(date, tz).unwrap_or(DateTime::<Utc>::MIN_UTC);
    let end = date
        .succ_opt()
        .and_then(|next| local_midnight_to_utc(next, tz).ok())
        .map_or(DateTime::<Utc>::MAX_UTC, |next| next - Duration::milliseconds(1));
    debug!(%instant, %tz, %start, %end, "day bounds clamped to the representable range");

    DateRange {
        start: start.min(instant),
        end: end.max(instant),
    }
}

/// Compute the bounds of a local calendar date in `tz`.
pub fn day_bounds_for_date(date: NaiveDate, tz: Tz) -> Result<DateRange> {
    local_days_range(date, date, tz)
}

/// Compute the local week containing `instant`.
///
/// The range runs from local midnight of the week's first day to the last
/// millisecond of its seventh day. A week that runs past the representable
/// calendar falls back to [`day_bounds`].
pub fn week_bounds(instant: DateTime<Utc>, tz: Tz, week_start: WeekStart) -> DateRange {
    let date = instant.with_timezone(&tz).date_naive();
    let weekday = date.weekday();

    let days_from_week_start = match week_start {
        WeekStart::Monday => weekday.num_days_from_monday(),
        WeekStart::Sunday => weekday.num_days_from_sunday(),
    };

    let week = date
        .checked_sub_days(Days::new(u64::from(days_from_week_start)))
        .and_then(|first| Some((first, first.checked_add_days(Days::new(6))?)));

    week.and_then(|(first, last)| local_days_range(first, last, tz).ok())
        .unwrap_or_else(|| day_bounds(instant, tz))
}

/// Inclusive range from the start of local date `first` to the end of local
/// date `last`.
pub(crate) fn local_days_range(first: NaiveDate, last: NaiveDate, tz: Tz) -> Result<DateRange> {
    let out_of_range =
        |e: DayclockError| DayclockError::InvalidRange(format!("{} to {}: {}", first, last, e));

    let start = local_midnight_to_utc(first, tz).map_err(out_of_range)?;
    let next = last.checked_add_days(Days::new(1)).ok_or_else(|| {
        DayclockError::InvalidRange(format!("no calendar day follows {}", last))
    })?;
    let end = local_midnight_to_utc(next, tz).map_err(out_of_range)? - Duration::milliseconds(1);

    DateRange::new(start, end)
}

/// Convert local midnight of `date` to UTC.
fn local_midnight_to_utc(date: NaiveDate, tz: Tz) -> Result<DateTime<Utc>> {
    let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
        DayclockError::InvalidWallClock(format!("no midnight on {}", date))
    })?;
    local_to_utc(midnight, tz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::format_instant;
    use crate::tz::parse_tz;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, 0).single().unwrap()
    }

    #[test]
    fn day_bounds_in_utc() {
        let range = day_bounds(utc(2024, 1, 15, 12, 0), parse_tz("UTC").unwrap());
        assert_eq!(format_instant(&range.start), "2024-01-15T00:00:00.000Z");
        assert_eq!(format_instant(&range.end), "2024-01-15T23:59:59.999Z");
    }

    #[test]
    fn day_bounds_normal_day() {
        // 2026-03-28 12:00 UTC = 2026-03-28 13:00 Berlin (before DST)
        let range = day_bounds(utc(2026, 3, 28, 12, 0), parse_tz("Europe/Berlin").unwrap());
        assert_eq!(format_instant(&range.start), "2026-03-27T23:00:00.000Z");
        assert_eq!(format_instant(&range.end), "2026-03-28T22:59:59.999Z");
        assert_eq!(range.span(), Duration::hours(24) - Duration::milliseconds(1));
    }

    #[test]
    fn day_bounds_spring_forward_is_23_hours() {
        // DST switch in Berlin: 2026-03-29 02:00 -> 03:00
        let range = day_bounds(utc(2026, 3, 29, 0, 15), parse_tz("Europe/Berlin").unwrap());
        assert_eq!(format_instant(&range.start), "2026-03-28T23:00:00.000Z");
        assert_eq!(format_instant(&range.end), "2026-03-29T21:59:59.999Z");
        assert_eq!(range.span() + Duration::milliseconds(1), Duration::hours(23));
    }

    #[test]
    fn day_bounds_fall_back_is_25_hours() {
        // DST switch in Berlin: 2026-10-25 03:00 -> 02:00
        let range = day_bounds(utc(2026, 10, 25, 1, 0), parse_tz("Europe/Berlin").unwrap());
        assert_eq!(format_instant(&range.start), "2026-10-24T22:00:00.000Z");
        assert_eq!(format_instant(&range.end), "2026-10-25T22:59:59.999Z");
        assert_eq!(range.span() + Duration::milliseconds(1), Duration::hours(25));
    }

    #[test]
    fn day_bounds_when_midnight_is_skipped() {
        // Santiago 2024-09-08: 00:00 -04 -> 01:00 -03, local midnight never occurs.
        let tz = parse_tz("America/Santiago").unwrap();
        let range = day_bounds(utc(2024, 9, 8, 15, 0), tz);
        assert_eq!(format_instant(&range.start), "2024-09-08T04:00:00.000Z");
        assert_eq!(
            range.start.with_timezone(&tz).format("%H:%M").to_string(),
            "01:00"
        );
        assert_eq!(format_instant(&range.end), "2024-09-09T02:59:59.999Z");
    }

    #[test]
    fn day_bounds_with_quarter_hour_offset() {
        // Kathmandu is UTC+05:45
        let range = day_bounds(utc(2024, 1, 15, 20, 0), parse_tz("Asia/Kathmandu").unwrap());
        assert_eq!(format_instant(&range.start), "2024-01-15T18:15:00.000Z");
        assert_eq!(format_instant(&range.end), "2024-01-16T18:14:59.999Z");
    }

    #[test]
    fn day_bounds_for_explicit_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let range = day_bounds_for_date(date, parse_tz("America/New_York").unwrap()).unwrap();
        assert_eq!(format_instant(&range.start), "2024-01-15T05:00:00.000Z");
        assert_eq!(format_instant(&range.end), "2024-01-16T04:59:59.999Z");
    }

    #[test]
    fn week_bounds_monday_start() {
        // 2026-03-29 is a Sunday; the Monday week is 03-23..03-29 and
        // contains the spring-forward day.
        let tz = parse_tz("Europe/Berlin").unwrap();
        let range = week_bounds(utc(2026, 3, 29, 12, 0), tz, WeekStart::Monday);
        assert_eq!(format_instant(&range.start), "2026-03-22T23:00:00.000Z");
        assert_eq!(format_instant(&range.end), "2026-03-29T21:59:59.999Z");
        assert_eq!(
            range.span() + Duration::milliseconds(1),
            Duration::hours(7 * 24 - 1)
        );
    }

    #[test]
    fn week_bounds_sunday_start() {
        let tz = parse_tz("Europe/Berlin").unwrap();
        let range = week_bounds(utc(2026, 3, 29, 12, 0), tz, WeekStart::Sunday);
        assert_eq!(format_instant(&range.start), "2026-03-28T23:00:00.000Z");
        assert_eq!(format_instant(&range.end), "2026-04-04T21:59:59.999Z");
    }

    #[test]
    fn last_representable_day_is_clamped() {
        let instant = DateTime::<Utc>::MAX_UTC;
        let range = day_bounds(instant, Tz::UTC);

        assert_eq!(range.start, instant.date_naive().and_hms_opt(0, 0, 0).unwrap().and_utc());
        assert_eq!(range.end, instant);
        assert!(range.span() > Duration::hours(23));

        let week = week_bounds(instant, Tz::UTC, WeekStart::Monday);
        assert!(week.contains(instant));
        assert!(week.span() > Duration::zero());
    }

    #[test]
    fn first_representable_day_is_a_full_day() {
        let instant = DateTime::<Utc>::MIN_UTC;
        let range = day_bounds(instant, Tz::UTC);

        assert_eq!(range.start, instant);
        assert!(range.contains(instant));
        assert!(range.span() > Duration::hours(23));
    }

    #[test]
    fn days_beyond_the_calendar_are_invalid_ranges() {
        let last = NaiveDate::MAX;
        assert!(matches!(
            day_bounds_for_date(last, Tz::UTC),
            Err(DayclockError::InvalidRange(_))
        ));
    }
}
