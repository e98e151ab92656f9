use std::process::ExitCode;

use chrono_tz::Tz;
use dayclock_core::tz::format_rfc3339;
use dayclock_core::{
    DateRange, DayKey, TimestampFormat, WeekStart, day_bounds, day_key, format_instant,
    parse_timestamp, week_bounds,
};
use serde::Serialize;

use crate::cli::DayArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{
    open_input, parse_format, parse_week_start, read_lines, resolve_tz_arg, to_json,
};

#[derive(Debug, Serialize)]
struct DayResult {
    input: String,
    epoch_ms: i64,
    tz: String,
    local: String,
    day: DayKey,
    bounds: DateRange,
    #[serde(skip_serializing_if = "Option::is_none")]
    week: Option<DateRange>,
}

pub fn run_day(args: DayArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = resolve_tz_arg(args.tz.as_deref())?;
    let format = parse_format(&args.format)?;
    let week_start = args
        .week_start
        .as_deref()
        .map(parse_week_start)
        .transpose()?;

    let lines = read_lines(open_input(&args.input, args.stdin)?)?;

    for (line_no, line) in lines {
        let result = process_day_line(&line, tz, format, week_start).map_err(|e| {
            CliError::input(format!("Error processing '{}' (line {}): {}", line, line_no, e))
        })?;

        match output_format {
            OutputFormat::Json => println!("{}", to_json(&result, false)?),
            OutputFormat::Text => {
                let mut out = format!(
                    "{} -> {} [{} .. {}]",
                    result.input,
                    result.day,
                    format_instant(&result.bounds.start),
                    format_instant(&result.bounds.end)
                );
                if let Some(week) = result.week {
                    out.push_str(&format!(
                        " week [{} .. {}]",
                        format_instant(&week.start),
                        format_instant(&week.end)
                    ));
                }
                println!("{}", out);
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn process_day_line(
    input: &str,
    tz: Tz,
    format: TimestampFormat,
    week_start: Option<WeekStart>,
) -> CliResult<DayResult> {
    let instant = parse_timestamp(input, format)?;

    Ok(DayResult {
        input: input.to_string(),
        epoch_ms: instant.timestamp_millis(),
        tz: tz.to_string(),
        local: format_rfc3339(&instant.with_timezone(&tz)),
        day: day_key(instant, tz),
        bounds: day_bounds(instant, tz),
        week: week_start.map(|ws| week_bounds(instant, tz, ws)),
    })
}
