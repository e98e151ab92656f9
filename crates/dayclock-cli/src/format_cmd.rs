use std::process::ExitCode;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use dayclock_core::{LocaleId, day_key, format_date, format_date_time, parse_timestamp};
use serde::Serialize;
use tracing::debug;

use crate::cli::FormatArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{
    open_input, parse_format, read_lines, resolve_locale_arg, resolve_tz_arg, to_json,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Date,
    DateTime,
}

fn parse_style(s: &str) -> CliResult<Style> {
    match s.to_lowercase().as_str() {
        "date" => Ok(Style::Date),
        "datetime" | "date-time" | "date_time" => Ok(Style::DateTime),
        _ => Err(CliError::input(format!(
            "Invalid style '{}'. Expected: date, datetime",
            s
        ))),
    }
}

#[derive(Debug, Serialize)]
struct FormatResult {
    input: String,
    locale: String,
    /// Grouping key for the same instant, for comparison with the display text.
    day: String,
    display: String,
}

pub fn run_format(args: FormatArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = resolve_tz_arg(args.tz.as_deref())?;
    let locale = resolve_locale_arg(args.locale.as_deref());
    let style = parse_style(&args.style)?;
    let format = parse_format(&args.format)?;

    if locale.is_fallback() {
        debug!(locale = %locale, "locale has no data, using en-US patterns");
    }

    let lines = read_lines(open_input(&args.input, args.stdin)?)?;

    for (line_no, line) in lines {
        let instant = parse_timestamp(&line, format).map_err(|e| {
            CliError::input(format!("Error processing '{}' (line {}): {}", line, line_no, e))
        })?;
        let result = format_instant_for(&line, instant, tz, &locale, style);

        match output_format {
            OutputFormat::Json => println!("{}", to_json(&result, false)?),
            OutputFormat::Text => println!("{}", result.display),
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn format_instant_for(
    input: &str,
    instant: DateTime<Utc>,
    tz: Tz,
    locale: &LocaleId,
    style: Style,
) -> FormatResult {
    let display = match style {
        Style::Date => format_date(instant, tz, locale),
        Style::DateTime => format_date_time(instant, tz, locale),
    };

    FormatResult {
        input: input.to_string(),
        locale: locale.tag().to_string(),
        day: day_key(instant, tz).to_string(),
        display,
    }
}
