//! Bucketing records by local calendar day.
//!
//! Records are assigned to the [`DayKey`] of their timestamp in the requested
//! timezone. A record without a usable timestamp is skipped on its own; it
//! never aborts or corrupts the grouping of the others.

use std::hash::Hash;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::warn;

use crate::error::{DayclockError, Result};
use crate::models::{DateRange, DayKey};
use crate::parse::{TimestampFormat, parse_timestamp};
use crate::range::days_in_range;

/// The local day containing `instant` in `tz`.
///
/// # Examples
///
/// ```
/// use dayclock_core::group::day_key;
/// use dayclock_core::tz::parse_tz;
/// use chrono::{TimeZone, Utc};
///
/// let instant = Utc.with_ymd_and_hms(2024, 1, 15, 23, 30, 0).unwrap();
/// assert_eq!(day_key(instant, parse_tz("Europe/London").unwrap()).to_string(), "2024-01-15");
/// assert_eq!(day_key(instant, parse_tz("Pacific/Kiritimati").unwrap()).to_string(), "2024-01-16");
/// ```
pub fn day_key(instant: DateTime<Utc>, tz: Tz) -> DayKey {
    DayKey::new(instant.with_timezone(&tz).date_naive())
}

/// Whether `a` and `b` fall on the same local day in `tz`.
pub fn is_same_day(a: DateTime<Utc>, b: DateTime<Utc>, tz: Tz) -> bool {
    day_key(a, tz) == day_key(b, tz)
}

/// Read a record's stored timestamp, rejecting missing or empty values.
///
/// Intended for use inside a `key_of` closure passed to [`group_by_day`].
pub fn record_timestamp(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw.map(str::trim) {
        None => Err(DayclockError::malformed("missing timestamp")),
        Some("") => Err(DayclockError::malformed("empty timestamp")),
        Some(value) => parse_timestamp(value, TimestampFormat::Auto)
            .map_err(|e| DayclockError::malformed(e.to_string())),
    }
}

/// Identifiers grouped by local day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayGroups<Id: Hash + Eq> {
    /// Days in order of first appearance, each with its distinct identifiers
    /// in order of first appearance.
    pub days: IndexMap<DayKey, IndexSet<Id>>,
    /// Records that were skipped.
    #[serde(skip)]
    pub skipped: Vec<DayclockError>,
}

impl<Id: Hash + Eq> DayGroups<Id> {
    /// Identifiers recorded for `key`.
    pub fn get(&self, key: &DayKey) -> Option<&IndexSet<Id>> {
        self.days.get(key)
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Days in chronological order.
    pub fn sorted(&self) -> Vec<(&DayKey, &IndexSet<Id>)> {
        let mut days: Vec<_> = self.days.iter().collect();
        days.sort_by_key(|(key, _)| **key);
        days
    }
}

/// Group identifiers by the local day of their timestamps.
///
/// `key_of` extracts `(timestamp, id)` from a record. A record for which it
/// fails is logged, recorded in [`DayGroups::skipped`] with its index, and
/// left out.
pub fn group_by_day<R, Id, I, F>(records: I, tz: Tz, key_of: F) -> DayGroups<Id>
where
    I: IntoIterator<Item = R>,
    F: FnMut(&R) -> Result<(DateTime<Utc>, Id)>,
    Id: Hash + Eq,
{
    group_by_day_with(records, tz, key_of, |_| {})
}

/// [`group_by_day`] with a callback invoked for each skipped record.
pub fn group_by_day_with<R, Id, I, F, S>(
    records: I,
    tz: Tz,
    mut key_of: F,
    mut on_malformed: S,
) -> DayGroups<Id>
where
    I: IntoIterator<Item = R>,
    F: FnMut(&R) -> Result<(DateTime<Utc>, Id)>,
    S: FnMut(&DayclockError),
    Id: Hash + Eq,
{
    let mut days: IndexMap<DayKey, IndexSet<Id>> = IndexMap::new();
    let mut skipped = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        match key_of(&record) {
            Ok((instant, id)) => {
                days.entry(day_key(instant, tz)).or_default().insert(id);
            }
            Err(err) => {
                let err = with_index(err, index);
                warn!(%err, "skipping record");
                on_malformed(&err);
                skipped.push(err);
            }
        }
    }

    DayGroups { days, skipped }
}

fn with_index(err: DayclockError, index: usize) -> DayclockError {
    let reason = match err {
        DayclockError::MalformedRecord { reason, .. } => reason,
        other => other.to_string(),
    };
    DayclockError::MalformedRecord { index, reason }
}

/// One local day's summed quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyTotal {
    pub day: DayKey,
    pub total: f64,
    /// Number of records that contributed.
    pub count: usize,
}

/// Sum a per-record quantity for every local day of `range`.
///
/// Every day touched by `range` appears in the output, in chronological order,
/// with zero for days that have no records. Records outside `range` are
/// ignored; records whose timestamp cannot be read are skipped and logged.
pub fn daily_totals<R, I, F>(
    records: I,
    range: &DateRange,
    tz: Tz,
    mut value_of: F,
) -> Vec<DailyTotal>
where
    I: IntoIterator<Item = R>,
    F: FnMut(&R) -> Result<(DateTime<Utc>, f64)>,
{
    let mut totals: IndexMap<DayKey, DailyTotal> = days_in_range(range, tz)
        .into_iter()
        .map(|day| {
            (
                day,
                DailyTotal {
                    day,
                    total: 0.0,
                    count: 0,
                },
            )
        })
        .collect();

    for (index, record) in records.into_iter().enumerate() {
        match value_of(&record) {
            Ok((instant, value)) if range.contains(instant) => {
                if let Some(entry) = totals.get_mut(&day_key(instant, tz)) {
                    entry.total += value;
                    entry.count += 1;
                }
            }
            Ok(_) => {}
            Err(err) => {
                let err = with_index(err, index);
                warn!(%err, "skipping record");
            }
        }
    }

    totals.into_values().collect()
}
