use std::process::ExitCode;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use dayclock_core::{DayGroups, DayKey, DayclockError, group_by_day, record_timestamp};
use serde::Serialize;

use crate::cli::GroupArgs;
use crate::error::{CliError, CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{open_input, read_lines, resolve_tz_arg, to_json};

#[derive(Debug, Serialize)]
struct GroupOutput<'a> {
    tz: String,
    days: Vec<DayEntry<'a>>,
    skipped: Vec<SkippedLine>,
}

#[derive(Debug, Serialize)]
struct DayEntry<'a> {
    day: DayKey,
    ids: Vec<&'a str>,
}

#[derive(Debug, Serialize)]
struct SkippedLine {
    line: usize,
    reason: String,
}

pub fn run_group(args: GroupArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = resolve_tz_arg(args.tz.as_deref())?;
    let lines = read_lines(open_input(&args.input, args.stdin)?)?;

    let groups = group_lines(&lines, tz);
    let skipped = skipped_lines(&groups, &lines);

    if args.strict
        && let Some(first) = skipped.first()
    {
        return Err(CliError::input(format!(
            "Malformed record on line {}: {}",
            first.line, first.reason
        ))
        .with_status("malformed_record"));
    }

    let output = GroupOutput {
        tz: tz.to_string(),
        days: groups
            .sorted()
            .into_iter()
            .map(|(day, ids)| DayEntry {
                day: *day,
                ids: ids.iter().map(String::as_str).collect(),
            })
            .collect(),
        skipped,
    };

    match output_format {
        OutputFormat::Json => println!("{}", to_json(&output, true)?),
        OutputFormat::Text => {
            for entry in &output.days {
                println!("{}: {}", entry.day, entry.ids.join(", "));
            }
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

fn group_lines(lines: &[(usize, String)], tz: Tz) -> DayGroups<String> {
    group_by_day(lines, tz, |record: &&(usize, String)| {
        parse_record(&record.1)
    })
}

/// Parse a `timestamp,id` line.
fn parse_record(line: &str) -> dayclock_core::Result<(DateTime<Utc>, String)> {
    let (timestamp, id) = line
        .split_once(',')
        .ok_or_else(|| DayclockError::malformed("expected 'timestamp,id'"))?;

    let id = id.trim();
    if id.is_empty() {
        return Err(DayclockError::malformed("empty id"));
    }

    Ok((record_timestamp(Some(timestamp))?, id.to_string()))
}

/// Map skipped record indices back to input line numbers.
fn skipped_lines(groups: &DayGroups<String>, lines: &[(usize, String)]) -> Vec<SkippedLine> {
    groups
        .skipped
        .iter()
        .filter_map(|err| match err {
            DayclockError::MalformedRecord { index, reason } => Some(SkippedLine {
                line: lines.get(*index).map_or(*index + 1, |(line_no, _)| *line_no),
                reason: reason.clone(),
            }),
            _ => None,
        })
        .collect()
}
