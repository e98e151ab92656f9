//! # dayclock-core
//!
//! Timezone-aware local-day aggregation for timestamped records.
//!
//! Records are stored as absolute UTC instants, but people think in local
//! calendar days. This library answers two questions for any IANA timezone:
//! which local day an instant falls on, and which UTC instants bound the last
//! N local days.
//!
//! ## Features
//!
//! - **DST Safety**: Day boundaries are computed in local time and converted
//!   independently to UTC, so 23-hour and 25-hour days come out right.
//! - **Any Offset**: Half- and quarter-hour zones (Asia/Kolkata,
//!   Asia/Kathmandu, Australia/Lord_Howe) work like any other.
//! - **Documented Gap/Fold Policy**: Nonexistent local times shift forward by
//!   the gap, ambiguous ones resolve to the earlier instant.
//! - **Grouping**: Bucket records by [`DayKey`] with per-record error
//!   isolation.
//! - **Locale Formatting**: Display strings kept apart from grouping keys.
//!
//! ## Example
//!
//! ```rust
//! use dayclock_core::prelude::*;
//! use chrono::{TimeZone, Utc};
//!
//! let tz = parse_tz("Europe/Warsaw").unwrap();
//! let now = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
//!
//! let range = last_n_days_range(7, tz, now).unwrap();
//! assert_eq!(format_instant(&range.start), "2024-01-07T23:00:00.000Z");
//! assert_eq!(format_instant(&range.end), "2024-01-15T22:59:59.999Z");
//!
//! let a = parse_timestamp("2024-01-10T13:00:00Z", TimestampFormat::Rfc3339).unwrap();
//! let b = parse_timestamp("2024-01-10T10:00:00Z", TimestampFormat::Rfc3339).unwrap();
//! assert!(is_same_day(a, b, tz));
//! ```

pub mod bounds;
pub mod env;
pub mod error;
pub mod group;
pub mod locale;
pub mod models;
pub mod parse;
pub mod range;
pub mod tz;

// Re-export commonly used types at the crate root
pub use bounds::{day_bounds, day_bounds_for_date, week_bounds};
pub use env::{Clock, Environment, FixedClock, SystemClock};
pub use error::{DayclockError, Result};
pub use group::{
    DailyTotal, DayGroups, daily_totals, day_key, group_by_day, group_by_day_with, is_same_day,
    record_timestamp,
};
pub use locale::{LocaleId, format_date, format_date_time};
pub use models::{DateRange, DayKey, LocalTime, WallClock, WeekStart, format_instant};
pub use parse::{TimestampFormat, parse_local_date, parse_timestamp, parse_wall_clock};
pub use range::{
    days_in_range, is_date_in_range, last_n_days, last_n_days_range, range_between_dates,
    range_for_date, today,
};
pub use tz::{classify_local, from_wall_clock, parse_tz, to_wall_clock};

/// Prelude module for convenient imports.
///
/// ```
/// use dayclock_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bounds::{day_bounds, day_bounds_for_date, week_bounds};
    pub use crate::env::{Clock, Environment, FixedClock, SystemClock};
    pub use crate::error::{DayclockError, Result};
    pub use crate::group::*;
    pub use crate::locale::{LocaleId, format_date, format_date_time};
    pub use crate::models::*;
    pub use crate::parse::{TimestampFormat, parse_local_date, parse_timestamp, parse_wall_clock};
    pub use crate::range::*;
    pub use crate::tz::{classify_local, from_wall_clock, parse_tz, to_wall_clock};
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn full_workflow_last_week_in_warsaw() {
        let now = chrono::Utc
            .with_ymd_and_hms(2024, 1, 15, 12, 0, 0)
            .single()
            .unwrap();
        let tz = parse_tz("Europe/Warsaw").unwrap();
        let range = last_n_days_range(7, tz, now).unwrap();

        let inside = parse_timestamp("2024-01-07T23:00:00Z", TimestampFormat::Rfc3339).unwrap();
        let outside = parse_timestamp("2024-01-15T23:00:00Z", TimestampFormat::Rfc3339).unwrap();
        assert!(is_date_in_range(inside, &range));
        assert!(!is_date_in_range(outside, &range));
        assert_eq!(days_in_range(&range, tz).len(), 8);
    }

    #[test]
    fn wall_clock_round_trip_through_crate_root() {
        let tz = parse_tz("Asia/Kolkata").unwrap();
        let instant = parse_timestamp("1705320000123", TimestampFormat::EpochMs).unwrap();
        let wall = to_wall_clock(instant, tz);
        assert_eq!((wall.hour, wall.minute, wall.millisecond), (17, 30, 123));
        assert_eq!(from_wall_clock(&wall, tz).unwrap(), instant);
    }

    #[test]
    fn prelude_exports() {
        use crate::prelude::*;

        let _tz = parse_tz("UTC").unwrap();
        let _format = TimestampFormat::EpochMs;
        let _week = WeekStart::Monday;
        let _locale = LocaleId::default();
    }
}
