//! Timezone handling: projecting instants onto wall clocks and back.
//!
//! All offsets come from the IANA database bundled with chrono-tz, so the
//! offset in force at each instant is used rather than a fixed one.
//!
//! Wall-clock times that do not map to exactly one instant are resolved
//! deterministically:
//!
//! - **Gap** (spring forward, the local time never occurs): the wall clock is
//!   interpreted with the offset in force *before* the transition. The result
//!   reads as the requested time shifted forward by the size of the gap, e.g.
//!   `02:30` on a Europe/Berlin spring-forward day becomes `03:30+02:00`.
//! - **Fold** (fall back, the local time occurs twice): the earlier of the two
//!   instants is used.

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::{DayclockError, Result};
use crate::models::{LocalTime, WallClock};

/// Parse an IANA timezone name into a [`chrono_tz::Tz`].
///
/// # Examples
///
/// ```
/// use dayclock_core::tz::parse_tz;
///
/// let tz = parse_tz("Europe/Warsaw").unwrap();
/// assert_eq!(tz.to_string(), "Europe/Warsaw");
/// assert!(parse_tz("Mars/Olympus").is_err());
/// ```
pub fn parse_tz(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| DayclockError::InvalidTimezone(name.to_string()))
}

/// Project an instant onto the wall clock of `tz`.
///
/// Sub-millisecond precision is truncated.
pub fn to_wall_clock(instant: DateTime<Utc>, tz: Tz) -> WallClock {
    WallClock::from_naive(instant.with_timezone(&tz).naive_local())
}

/// Convert a wall-clock reading in `tz` back to an absolute instant.
///
/// This is the left inverse of [`to_wall_clock`] for every reading outside a
/// DST gap or fold; gaps and folds are resolved as described in the module
/// docs.
///
/// # Examples
///
/// ```
/// use dayclock_core::tz::{from_wall_clock, parse_tz, to_wall_clock};
/// use chrono::{TimeZone, Utc};
///
/// let tz = parse_tz("Asia/Kathmandu").unwrap();
/// let instant = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
/// let wall = to_wall_clock(instant, tz);
/// assert_eq!((wall.hour, wall.minute), (17, 45));
/// assert_eq!(from_wall_clock(&wall, tz).unwrap(), instant);
/// ```
pub fn from_wall_clock(wall: &WallClock, tz: Tz) -> Result<DateTime<Utc>> {
    classify_local(wall, tz).map(|local| local.resolved())
}

/// Classify a wall-clock reading as normal, inside a gap, or inside a fold.
pub fn classify_local(wall: &WallClock, tz: Tz) -> Result<LocalTime> {
    let naive = wall.to_naive()?;
    classify_naive(naive, tz)
}

/// Convert a naive local datetime to UTC using the gap/fold policy.
///
/// Fails only at the edges of the representable calendar, where no
/// transition offset can be looked up.
pub fn local_to_utc(local: NaiveDateTime, tz: Tz) -> Result<DateTime<Utc>> {
    classify_naive(local, tz).map(|local| local.resolved())
}

fn classify_naive(local: NaiveDateTime, tz: Tz) -> Result<LocalTime> {
    match tz.from_local_datetime(&local) {
        LocalResult::Single(dt) => Ok(LocalTime::Normal(dt.with_timezone(&Utc))),
        LocalResult::Ambiguous(first, second) => {
            let (first, second) = (first.with_timezone(&Utc), second.with_timezone(&Utc));
            let (earlier, later) = if first <= second {
                (first, second)
            } else {
                (second, first)
            };
            debug!(%local, %tz, %earlier, %later, "ambiguous local time, using earlier instant");
            Ok(LocalTime::Fold { earlier, later })
        }
        LocalResult::None => {
            let offset = offset_before_transition(local, tz)?;
            let resolved = local
                .checked_sub_signed(Duration::seconds(i64::from(offset)))
                .ok_or_else(|| out_of_range(local, tz))?
                .and_utc();
            let gap = resolved.with_timezone(&tz).naive_local() - local;
            debug!(
                %local,
                %tz,
                %resolved,
                gap_secs = gap.num_seconds(),
                "nonexistent local time, shifting forward"
            );
            Ok(LocalTime::Gap { resolved, gap })
        }
    }
}

/// UTC offset in seconds in force shortly before the transition that
/// skipped `local`.
fn offset_before_transition(local: NaiveDateTime, tz: Tz) -> Result<i32> {
    // A day earlier, read as UTC, is before the transition for every
    // offset in the database and after any previous one.
    let before = local
        .checked_sub_signed(Duration::days(1))
        .ok_or_else(|| out_of_range(local, tz))?;
    Ok(tz.offset_from_utc_datetime(&before).fix().local_minus_utc())
}

fn out_of_range(local: NaiveDateTime, tz: Tz) -> DayclockError {
    DayclockError::InvalidWallClock(format!(
        "{} in {} is outside the representable range",
        local, tz
    ))
}

/// Format a datetime as RFC3339 with its local offset and milliseconds.
///
/// # Examples
///
/// ```
/// use dayclock_core::tz::{format_rfc3339, parse_tz};
/// use chrono::TimeZone;
///
/// let tz = parse_tz("Europe/Warsaw").unwrap();
/// let dt = tz.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
/// assert_eq!(format_rfc3339(&dt), "2024-01-15T00:00:00.000+01:00");
/// ```
pub fn format_rfc3339<T: TimeZone>(dt: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    dt.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string()
}
