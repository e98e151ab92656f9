//! Core data types for dayclock.
//!
//! This module defines the values the engine computes on demand:
//! - [`WallClock`] - How an instant reads on a clock in some timezone
//! - [`DateRange`] - An inclusive pair of absolute instants
//! - [`DayKey`] - Canonical identifier of one local calendar day
//! - [`WeekStart`] - Week boundary configuration
//! - [`LocalTime`] - Classification of a wall-clock time against DST transitions
//!
//! None of these are persisted; they are created per query and discarded.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Utc};
use serde::{Serialize, Serializer};

use crate::error::{DayclockError, Result};

/// The calendar and clock reading of an instant in a particular timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct WallClock {
    pub year: i32,
    /// 1-12
    pub month: u32,
    /// 1-31
    pub day: u32,
    /// 0-23
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    /// 0-999
    pub millisecond: u32,
}

impl WallClock {
    /// A wall clock at `00:00:00.000` on the given date.
    pub fn midnight(date: NaiveDate) -> Self {
        WallClock {
            year: date.year(),
            month: date.month(),
            day: date.day(),
            hour: 0,
            minute: 0,
            second: 0,
            millisecond: 0,
        }
    }

    /// The local calendar date of this reading.
    pub fn date(&self) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or_else(|| {
            DayclockError::InvalidWallClock(format!(
                "{:04}-{:02}-{:02} is not a calendar date",
                self.year, self.month, self.day
            ))
        })
    }

    /// Convert to a naive datetime, validating every field.
    pub fn to_naive(&self) -> Result<NaiveDateTime> {
        let date = self.date()?;
        date.and_hms_milli_opt(self.hour, self.minute, self.second, self.millisecond)
            .filter(|_| self.millisecond < 1000)
            .ok_or_else(|| {
                DayclockError::InvalidWallClock(format!(
                    "{:02}:{:02}:{:02}.{:03} is not a time of day",
                    self.hour, self.minute, self.second, self.millisecond
                ))
            })
    }

    /// Build from a naive datetime, truncating to millisecond precision.
    ///
    /// A leap second reads as `:59.999`.
    pub fn from_naive(naive: NaiveDateTime) -> Self {
        WallClock {
            year: naive.year(),
            month: naive.month(),
            day: naive.day(),
            hour: naive.hour(),
            minute: naive.minute(),
            second: naive.second(),
            millisecond: (naive.nanosecond() / 1_000_000).min(999),
        }
    }
}

impl From<NaiveDateTime> for WallClock {
    fn from(naive: NaiveDateTime) -> Self {
        WallClock::from_naive(naive)
    }
}

impl fmt::Display for WallClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
            self.year, self.month, self.day, self.hour, self.minute, self.second, self.millisecond
        )
    }
}

/// An inclusive window of absolute instants with `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct DateRange {
    #[serde(serialize_with = "serialize_instant")]
    pub start: DateTime<Utc>,
    #[serde(serialize_with = "serialize_instant")]
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Create a range, rejecting `start > end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start > end {
            return Err(DayclockError::InvalidRange(format!(
                "start {} is after end {}",
                format_instant(&start),
                format_instant(&end)
            )));
        }
        Ok(DateRange { start, end })
    }

    /// Whether `instant` lies in the range, both ends included.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }

    /// Absolute length of the range.
    pub fn span(&self) -> Duration {
        self.end - self.start
    }
}

/// Canonical key of one local calendar day.
///
/// The textual form is ISO `yyyy-MM-dd`, so lexicographic order of the
/// strings is chronological, and so is the derived [`Ord`]. It is never a
/// display string; use [`crate::locale`] for presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayKey(NaiveDate);

impl DayKey {
    pub fn new(date: NaiveDate) -> Self {
        DayKey(date)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for DayKey {
    fn from(date: NaiveDate) -> Self {
        DayKey(date)
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for DayKey {
    type Err = DayclockError;

    fn from_str(s: &str) -> Result<Self> {
        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(DayKey)
            .map_err(|_| DayclockError::ParseError(format!("Invalid day key: '{}'", s)))
    }
}

impl Serialize for DayKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Week start day configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    /// Week starts on Monday (ISO 8601)
    #[default]
    Monday,
    /// Week starts on Sunday
    Sunday,
}

impl fmt::Display for WeekStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeekStart::Monday => write!(f, "monday"),
            WeekStart::Sunday => write!(f, "sunday"),
        }
    }
}

impl FromStr for WeekStart {
    type Err = DayclockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "monday" => Ok(WeekStart::Monday),
            "sunday" => Ok(WeekStart::Sunday),
            _ => Err(DayclockError::ParseError(format!(
                "Unknown week start: '{}'. Expected 'monday' or 'sunday'",
                s
            ))),
        }
    }
}

/// How a wall-clock time maps onto absolute instants in a timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocalTime {
    /// Exactly one instant reads as this wall clock.
    Normal(DateTime<Utc>),
    /// No instant reads as this wall clock (spring forward). `resolved` is the
    /// instant picked by the shift-forward policy; it reads `gap` later.
    Gap {
        resolved: DateTime<Utc>,
        gap: Duration,
    },
    /// Two instants read as this wall clock (fall back).
    Fold {
        earlier: DateTime<Utc>,
        later: DateTime<Utc>,
    },
}

impl LocalTime {
    /// The instant chosen by the documented policy: the only one, the
    /// shifted-forward one, or the earlier of a fold.
    pub fn resolved(&self) -> DateTime<Utc> {
        match *self {
            LocalTime::Normal(instant) => instant,
            LocalTime::Gap { resolved, .. } => resolved,
            LocalTime::Fold { earlier, .. } => earlier,
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            LocalTime::Normal(_) => "normal",
            LocalTime::Gap { .. } => "gap",
            LocalTime::Fold { .. } => "fold",
        }
    }
}

/// Format an instant as RFC3339 UTC with millisecond precision
/// (e.g. `2024-01-15T23:59:59.999Z`).
pub fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

fn serialize_instant<S: Serializer>(
    instant: &DateTime<Utc>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(&format_instant(instant))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn utc(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, mi, s).single().unwrap()
    }

    #[test]
    fn wall_clock_rejects_impossible_date() {
        let wall = WallClock {
            year: 2024,
            month: 2,
            day: 30,
            hour: 0,
            minute: 0,
            second: 0,
            millisecond: 0,
        };
        assert!(matches!(
            wall.to_naive(),
            Err(DayclockError::InvalidWallClock(_))
        ));
    }

    #[test]
    fn wall_clock_rejects_out_of_range_millisecond() {
        let wall = WallClock {
            millisecond: 1000,
            ..WallClock::midnight(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        };
        assert!(wall.to_naive().is_err());
    }

    #[test]
    fn wall_clock_display() {
        let naive = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_milli_opt(7, 8, 9, 42)
            .unwrap();
        assert_eq!(WallClock::from(naive).to_string(), "2024-01-05T07:08:09.042");
    }

    #[test]
    fn date_range_rejects_inverted_bounds() {
        let result = DateRange::new(utc(2024, 1, 2, 0, 0, 0), utc(2024, 1, 1, 0, 0, 0));
        assert!(matches!(result, Err(DayclockError::InvalidRange(_))));
    }

    #[test]
    fn date_range_contains_both_ends() {
        let range = DateRange::new(utc(2024, 1, 1, 0, 0, 0), utc(2024, 1, 1, 23, 59, 59)).unwrap();
        assert!(range.contains(range.start));
        assert!(range.contains(range.end));
        assert!(!range.contains(range.end + Duration::milliseconds(1)));
        assert!(!range.contains(range.start - Duration::milliseconds(1)));
    }

    #[test]
    fn date_range_serializes_with_milliseconds() {
        let range = DateRange::new(utc(2024, 1, 8, 0, 0, 0), utc(2024, 1, 8, 0, 0, 0)).unwrap();
        let json = serde_json::to_string(&range).unwrap();
        assert_eq!(
            json,
            r#"{"start":"2024-01-08T00:00:00.000Z","end":"2024-01-08T00:00:00.000Z"}"#
        );
    }

    #[test]
    fn day_key_round_trips_through_text() {
        let key: DayKey = "2024-01-15".parse().unwrap();
        assert_eq!(key.to_string(), "2024-01-15");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"2024-01-15\"");
        assert!("15/01/2024".parse::<DayKey>().is_err());
    }

    #[test]
    fn day_key_order_is_chronological() {
        let mut keys: Vec<DayKey> = ["2024-02-01", "2023-12-31", "2024-01-15"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        keys.sort();
        let rendered: Vec<String> = keys.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, ["2023-12-31", "2024-01-15", "2024-02-01"]);
    }

    #[test]
    fn week_start_parse_and_display() {
        assert_eq!("Sunday".parse::<WeekStart>().unwrap(), WeekStart::Sunday);
        assert_eq!(format!("{}", WeekStart::Monday), "monday");
        assert!("friday".parse::<WeekStart>().is_err());
    }
}
