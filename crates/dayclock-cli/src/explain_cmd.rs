use std::process::ExitCode;

use chrono_tz::Tz;
use dayclock_core::tz::format_rfc3339;
use dayclock_core::{LocalTime, WallClock, classify_local, format_instant, parse_wall_clock};
use serde::Serialize;

use crate::cli::ExplainArgs;
use crate::error::{CliResult, EXIT_SUCCESS, OutputFormat};
use crate::shared::{resolve_tz_arg, to_json};

pub fn run_explain(args: ExplainArgs, output_format: OutputFormat) -> CliResult<ExitCode> {
    let tz = resolve_tz_arg(args.tz.as_deref())?;
    let local = parse_wall_clock(&args.local)?;

    let result = explain_local_time(&local, tz)?;

    match output_format {
        OutputFormat::Json => println!("{}", to_json(&result, true)?),
        OutputFormat::Text => {
            println!("Local time: {}", result.local_time);
            println!("Timezone: {}", result.tz);
            println!("Status: {}", result.status);
            if let Some(gap) = result.gap_minutes {
                println!("Gap: {} minutes", gap);
            }
            if let Some(later) = &result.later {
                println!("Later instant: {}", later);
            }
            println!("Resolved: {} ({})", result.resolved, result.resolved_local);
        }
    }

    Ok(ExitCode::from(EXIT_SUCCESS))
}

#[derive(Debug, Serialize)]
struct ExplainResult {
    local_time: String,
    tz: String,
    status: &'static str,
    /// Instant chosen by the gap/fold policy.
    resolved: String,
    resolved_local: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    gap_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    later: Option<String>,
}

fn explain_local_time(local: &WallClock, tz: Tz) -> CliResult<ExplainResult> {
    let classified = classify_local(local, tz)?;
    let resolved = classified.resolved();

    let (gap_minutes, later) = match classified {
        LocalTime::Normal(_) => (None, None),
        LocalTime::Gap { gap, .. } => (Some(gap.num_minutes()), None),
        LocalTime::Fold { later, .. } => (None, Some(format_instant(&later))),
    };

    Ok(ExplainResult {
        local_time: local.to_string(),
        tz: tz.to_string(),
        status: classified.status(),
        resolved: format_instant(&resolved),
        resolved_local: format_rfc3339(&resolved.with_timezone(&tz)),
        gap_minutes,
        later,
    })
}
