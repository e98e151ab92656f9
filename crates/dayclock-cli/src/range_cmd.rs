use std::process::ExitCode;

use chrono_tz::Tz;
use dayclock_core::tz::format_rfc3339;
use dayclock_core::{
    Clock, DateRange, DayKey, FixedClock, SystemClock, days_in_range, format_instant, last_n_days,
    parse_local_date, range_between_dates, range_for_date,
};
use serde::Serialize;
use tracing::debug;

use crate::cli::RangeArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{parse_now, resolve_tz_arg, to_json};

/// Which query form selected the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum RangeKind {
    LastNDays,
    Date,
    Between,
}

#[derive(Debug, Serialize)]
struct RangeOutput {
    tz: String,
    kind: RangeKind,
    #[serde(flatten)]
    range: DateRange,
    start_local: String,
    end_local: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    days: Option<Vec<DayKey>>,
}

pub fn run_range(args: RangeArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = resolve_tz_arg(args.tz.as_deref())?;
    let now = parse_now(args.now.as_deref())?;

    let (kind, range) = select_range(&args, tz, now)?;
    debug!(?kind, start = %range.start, end = %range.end, "selected range");

    let output = RangeOutput {
        tz: tz.to_string(),
        kind,
        range,
        start_local: format_rfc3339(&range.start.with_timezone(&tz)),
        end_local: format_rfc3339(&range.end.with_timezone(&tz)),
        days: args.list_days.then(|| days_in_range(&range, tz)),
    };

    match output_format {
        OutputFormat::Json => println!("{}", to_json(&output, true)?),
        OutputFormat::Text => {
            println!(
                "{} .. {} ({} .. {})",
                format_instant(&output.range.start),
                format_instant(&output.range.end),
                output.start_local,
                output.end_local
            );
            for day in output.days.iter().flatten() {
                println!("{}", day);
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn select_range(
    args: &RangeArgs,
    tz: Tz,
    now: Option<chrono::DateTime<chrono::Utc>>,
) -> CliResult<(RangeKind, DateRange)> {
    match (
        args.days,
        args.date.as_deref(),
        args.from.as_deref(),
        args.to.as_deref(),
    ) {
        (Some(n), None, None, None) => {
            let clock: Box<dyn Clock> = match now {
                Some(instant) => Box::new(FixedClock::new(instant)),
                None => Box::new(SystemClock),
            };
            Ok((RangeKind::LastNDays, last_n_days(n, tz, clock.as_ref())?))
        }
        (None, Some(date), None, None) => Ok((RangeKind::Date, range_for_date(date, tz)?)),
        (None, None, Some(from), Some(to)) => {
            let from = parse_local_date(from)?;
            let to = parse_local_date(to)?;
            Ok((RangeKind::Between, range_between_dates(from, to, tz)?))
        }
        _ => Err(CliError::input(
            "Specify exactly one of --days N, --date D, or --from D --to D",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayclock_core::{TimestampFormat, parse_timestamp};

    fn args() -> RangeArgs {
        RangeArgs {
            tz: None,
            days: None,
            date: None,
            from: None,
            to: None,
            now: None,
            list_days: false,
            output_format: "json".to_string(),
        }
    }

    #[test]
    fn last_days_with_fixed_now() {
        let now = parse_timestamp("2024-01-15T12:00:00Z", TimestampFormat::Rfc3339).unwrap();
        let (kind, range) = select_range(
            &RangeArgs {
                days: Some(7),
                ..args()
            },
            Tz::America__New_York,
            Some(now),
        )
        .unwrap();
        assert_eq!(kind, RangeKind::LastNDays);
        assert_eq!(format_instant(&range.start), "2024-01-08T05:00:00.000Z");
        assert_eq!(format_instant(&range.end), "2024-01-16T04:59:59.999Z");
    }

    #[test]
    fn single_date_and_between() {
        let (kind, range) = select_range(
            &RangeArgs {
                date: Some("15/01/2024".to_string()),
                ..args()
            },
            Tz::Europe__Warsaw,
            None,
        )
        .unwrap();
        assert_eq!(kind, RangeKind::Date);
        assert_eq!(format_instant(&range.start), "2024-01-14T23:00:00.000Z");

        let (kind, range) = select_range(
            &RangeArgs {
                from: Some("2024-01-10".to_string()),
                to: Some("2024-01-12".to_string()),
                ..args()
            },
            Tz::UTC,
            None,
        )
        .unwrap();
        assert_eq!(kind, RangeKind::Between);
        assert_eq!(days_in_range(&range, Tz::UTC).len(), 3);
    }

    #[test]
    fn missing_selector_and_non_positive_days_fail() {
        assert!(select_range(&args(), Tz::UTC, None).is_err());
        let err = select_range(
            &RangeArgs {
                days: Some(0),
                ..args()
            },
            Tz::UTC,
            None,
        )
        .unwrap_err();
        assert_eq!(err.exit_code(), crate::error::EXIT_INPUT_ERROR);
    }
}
