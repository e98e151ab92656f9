use std::fs::File;
use std::io::{self, BufRead, BufReader};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use dayclock_core::env::{Environment, detect_locale};
use dayclock_core::{LocaleId, TimestampFormat, WeekStart, parse_timestamp, parse_tz};
use serde::Serialize;
use tracing::debug;

use crate::error::{CliError, CliResult};

/// Resolve `--tz`, falling back to `TZ` and then the platform zone.
///
/// `DAYCLOCK_TZ` arrives through clap's env fallback, so an unset flag here
/// means it was absent too.
pub fn resolve_tz_arg(tz: Option<&str>) -> CliResult<Tz> {
    match tz {
        Some(name) => parse_tz_or_input_error(name),
        None => {
            let env = Environment::detect().map_err(|e| {
                CliError::input(format!("{}. Pass --tz or set DAYCLOCK_TZ", e))
                    .with_status("invalid_timezone")
            })?;
            debug!(tz = %env.timezone, "resolved timezone from environment");
            Ok(env.timezone)
        }
    }
}

pub fn parse_tz_or_input_error(name: &str) -> CliResult<Tz> {
    parse_tz(name).map_err(|e| {
        CliError::input(format!("Invalid timezone '{}': {}", name, e))
            .with_status("invalid_timezone")
    })
}

/// Resolve `--locale`, falling back to the POSIX locale variables.
pub fn resolve_locale_arg(locale: Option<&str>) -> LocaleId {
    match locale {
        Some(tag) => LocaleId::parse(tag),
        None => detect_locale(),
    }
}

pub fn parse_week_start(s: &str) -> CliResult<WeekStart> {
    s.parse::<WeekStart>().map_err(|_| {
        CliError::input(format!(
            "Invalid week_start '{}'. Expected: monday, sunday",
            s
        ))
    })
}

pub fn parse_format(s: &str) -> CliResult<TimestampFormat> {
    s.parse::<TimestampFormat>().map_err(|_| {
        CliError::input(format!(
            "Invalid format '{}'. Expected: epoch_ms, epoch_s, rfc3339, auto",
            s
        ))
    })
}

pub fn parse_now(now: Option<&str>) -> CliResult<Option<DateTime<Utc>>> {
    now.map(|s| {
        parse_timestamp(s, TimestampFormat::Rfc3339)
            .map_err(|e| CliError::input(format!("Invalid --now: {}", e)))
    })
    .transpose()
}

/// Open `--input` (or stdin for `-` / `--stdin`) as a line reader.
pub fn open_input(input: &str, stdin: bool) -> CliResult<Box<dyn BufRead>> {
    if stdin || input == "-" {
        Ok(Box::new(io::stdin().lock()))
    } else {
        let file = File::open(input)
            .map_err(|e| CliError::runtime(format!("Failed to open file '{}': {}", input, e)))?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Non-empty trimmed lines of `reader`, with their 1-based line numbers.
pub fn read_lines(reader: Box<dyn BufRead>) -> CliResult<Vec<(usize, String)>> {
    let mut lines = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| CliError::runtime(format!("Failed to read line: {}", e)))?;
        let trimmed = line.trim();
        if !trimmed.is_empty() {
            lines.push((index + 1, trimmed.to_string()));
        }
    }
    Ok(lines)
}

pub fn to_json<T: Serialize>(value: &T, pretty: bool) -> CliResult<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.map_err(|e| CliError::runtime(format!("Failed to serialize JSON: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_tz_is_parsed() {
        assert_eq!(
            resolve_tz_arg(Some("Asia/Kathmandu")).unwrap(),
            Tz::Asia__Kathmandu
        );
        let err = resolve_tz_arg(Some("Mars/Olympus")).unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT_ERROR);
    }

    #[test]
    fn explicit_locale_is_parsed() {
        assert_eq!(resolve_locale_arg(Some("pl_PL")).tag(), "pl-PL");
    }

    #[test]
    fn flag_parsers() {
        assert_eq!(parse_week_start("Sunday").unwrap(), WeekStart::Sunday);
        assert!(parse_week_start("friday").is_err());
        assert_eq!(parse_format("epoch_s").unwrap(), TimestampFormat::EpochS);
        assert!(parse_format("unix").is_err());
        assert_eq!(parse_now(None).unwrap(), None);
        assert!(parse_now(Some("yesterday")).is_err());
    }
}
