use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod cli;
mod day_cmd;
mod error;
mod explain_cmd;
mod format_cmd;
mod group_cmd;
mod range_cmd;
mod shared;

use cli::{Cli, Commands};
use day_cmd::run_day;
use error::{
    CliResult, EXIT_RUNTIME_ERROR, OutputFormat, output_format_hint, parse_output_format,
    render_error,
};
use explain_cmd::run_explain;
use format_cmd::run_format;
use group_cmd::run_group;
use range_cmd::run_range;

/// Install the stderr log subscriber: `--verbose` forces debug, otherwise
/// `RUST_LOG` applies with a `warn` default.
fn init_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_new("debug").context("Failed to build debug log filter")?
    } else {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("warn"))
            .context("Failed to build log filter")?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("Failed to install log subscriber")
}

fn dispatch<A>(
    args: A,
    raw_output_format: &str,
    run: impl FnOnce(A, OutputFormat) -> CliResult<ExitCode>,
) -> ExitCode {
    let fallback = output_format_hint(raw_output_format);
    let output_format = match parse_output_format(raw_output_format) {
        Ok(format) => format,
        Err(err) => return render_error(&err, fallback),
    };

    match run(args, output_format) {
        Ok(code) => code,
        Err(err) => render_error(&err, output_format),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.verbose) {
        eprintln!("Error: {e:#}");
        return ExitCode::from(EXIT_RUNTIME_ERROR);
    }
    debug!("Parsed CLI args: {:?}", cli);

    match cli.command {
        Commands::Day(args) => {
            let format = args.output_format.clone();
            dispatch(args, &format, run_day)
        }
        Commands::Range(args) => {
            let format = args.output_format.clone();
            dispatch(args, &format, run_range)
        }
        Commands::Group(args) => {
            let format = args.output_format.clone();
            dispatch(args, &format, run_group)
        }
        Commands::Explain(args) => {
            let format = args.output_format.clone();
            dispatch(args, &format, run_explain)
        }
        Commands::Format(args) => {
            let format = args.output_format.clone();
            dispatch(args, &format, run_format)
        }
    }
}
