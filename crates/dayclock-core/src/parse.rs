//! Input parsing for instants, local dates and wall-clock readings.
//!
//! Instants arrive as:
//! - `epoch_ms`: Unix epoch milliseconds
//! - `epoch_s`: Unix epoch seconds
//! - `rfc3339`: ISO-8601 strings with a `Z` or offset suffix
//!   (e.g., `2024-01-15T12:00:00Z`, `2024-01-15T13:00:00.250+01:00`)
//!
//! Local dates arrive as `dd/MM/yyyy` (the form the summary views send) or
//! ISO `yyyy-MM-dd`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::error::{DayclockError, Result};
use crate::models::WallClock;

/// Supported timestamp formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimestampFormat {
    /// Unix epoch milliseconds (e.g., "1705320000000")
    EpochMs,
    /// Unix epoch seconds (e.g., "1705320000")
    EpochS,
    /// RFC3339 (e.g., "2024-01-15T12:00:00Z")
    #[default]
    Rfc3339,
    /// Pick one of the above from the shape of the input.
    Auto,
}

impl fmt::Display for TimestampFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimestampFormat::EpochMs => write!(f, "epoch_ms"),
            TimestampFormat::EpochS => write!(f, "epoch_s"),
            TimestampFormat::Rfc3339 => write!(f, "rfc3339"),
            TimestampFormat::Auto => write!(f, "auto"),
        }
    }
}

impl FromStr for TimestampFormat {
    type Err = DayclockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "epoch_ms" => Ok(TimestampFormat::EpochMs),
            "epoch_s" => Ok(TimestampFormat::EpochS),
            "rfc3339" | "iso" => Ok(TimestampFormat::Rfc3339),
            "auto" => Ok(TimestampFormat::Auto),
            _ => Err(DayclockError::ParseError(format!(
                "Unknown format: '{}'. Expected 'epoch_ms', 'epoch_s', 'rfc3339' or 'auto'",
                s
            ))),
        }
    }
}

/// Parse a timestamp string according to the specified format.
///
/// # Examples
///
/// ```
/// use dayclock_core::parse::{parse_timestamp, TimestampFormat};
/// use chrono::{TimeZone, Utc};
///
/// let dt = parse_timestamp("1705320000000", TimestampFormat::EpochMs).unwrap();
/// assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap());
///
/// let dt = parse_timestamp("2024-01-15T13:00:00+01:00", TimestampFormat::Rfc3339).unwrap();
/// assert_eq!(dt, Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap());
/// ```
pub fn parse_timestamp(input: &str, format: TimestampFormat) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(DayclockError::ParseError("Empty timestamp".to_string()));
    }

    match format {
        TimestampFormat::EpochMs => parse_epoch_ms(trimmed),
        TimestampFormat::EpochS => parse_epoch_s(trimmed),
        TimestampFormat::Rfc3339 => parse_rfc3339(trimmed),
        TimestampFormat::Auto => parse_timestamp_auto(trimmed),
    }
}

fn parse_epoch_ms(input: &str) -> Result<DateTime<Utc>> {
    let ms: i64 = input.parse().map_err(|_| {
        DayclockError::ParseError(format!(
            "Invalid epoch milliseconds: '{}'. Expected integer value.",
            input
        ))
    })?;

    Utc.timestamp_millis_opt(ms).single().ok_or_else(|| {
        DayclockError::ParseError(format!("Epoch milliseconds out of range: {}", ms))
    })
}

fn parse_epoch_s(input: &str) -> Result<DateTime<Utc>> {
    let s: i64 = input.parse().map_err(|_| {
        DayclockError::ParseError(format!(
            "Invalid epoch seconds: '{}'. Expected integer value.",
            input
        ))
    })?;

    Utc.timestamp_opt(s, 0)
        .single()
        .ok_or_else(|| DayclockError::ParseError(format!("Epoch seconds out of range: {}", s)))
}

fn parse_rfc3339(input: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(input)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            DayclockError::ParseError(format!(
                "Invalid RFC3339 timestamp: '{}'. Error: {}",
                input, e
            ))
        })
}

/// Parse a timestamp string, detecting the format from its shape.
///
/// Anything that is not a plain integer is treated as RFC3339. Integers above
/// 10^10 are taken as milliseconds (10^10 seconds is the year 2286), smaller
/// ones as seconds.
pub fn parse_timestamp_auto(input: &str) -> Result<DateTime<Utc>> {
    let trimmed = input.trim();

    match trimmed.parse::<i64>() {
        Ok(num) if num.abs() > 10_000_000_000 => parse_epoch_ms(trimmed),
        Ok(_) => parse_epoch_s(trimmed),
        Err(_) => parse_rfc3339(trimmed),
    }
}

/// Parse a local calendar date given as `dd/MM/yyyy` or `yyyy-MM-dd`.
///
/// # Examples
///
/// ```
/// use dayclock_core::parse::parse_local_date;
///
/// assert_eq!(parse_local_date("15/01/2024").unwrap(), parse_local_date("2024-01-15").unwrap());
/// ```
pub fn parse_local_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    let format = if trimmed.contains('/') {
        "%d/%m/%Y"
    } else {
        "%Y-%m-%d"
    };

    NaiveDate::parse_from_str(trimmed, format).map_err(|_| {
        DayclockError::ParseError(format!(
            "Invalid date '{}'. Expected dd/MM/yyyy or yyyy-MM-dd",
            input
        ))
    })
}

/// Parse a local wall-clock reading without offset, e.g. `2026-03-29T02:30:00`.
///
/// Accepts a `T` or a space between date and time, optional seconds and an
/// optional fraction.
pub fn parse_wall_clock(input: &str) -> Result<WallClock> {
    let formats = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];

    let trimmed = input.trim();
    formats
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(WallClock::from_naive)
        .ok_or_else(|| {
            DayclockError::ParseError(format!(
                "Invalid local time '{}'. Expected YYYY-MM-DDTHH:MM[:SS[.sss]]",
                input
            ))
        })
}
