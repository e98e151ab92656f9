use clap::{Parser, Subcommand};

/// Timezone-aware local-day aggregation tool
#[derive(Parser, Debug)]
#[command(name = "dayclock", version)]
#[command(about = "Timezone-aware local-day aggregation tool")]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the local day and day bounds of each timestamp
    Day(DayArgs),
    /// Compute the UTC bounds of a window of local days
    Range(RangeArgs),
    /// Group `timestamp,id` records by local day
    Group(GroupArgs),
    /// Explain how a local wall-clock time resolves (DST handling)
    Explain(ExplainArgs),
    /// Render timestamps for display in a locale
    Format(FormatArgs),
}

#[derive(clap::Args, Debug)]
pub struct DayArgs {
    /// IANA timezone (e.g., Europe/Warsaw); defaults to TZ or the system zone
    #[arg(short, long, env = "DAYCLOCK_TZ")]
    pub tz: Option<String>,

    /// Also print the week containing each timestamp: monday or sunday
    #[arg(long)]
    pub week_start: Option<String>,

    /// Input format: epoch_ms, epoch_s, rfc3339, auto
    #[arg(short = 'f', long, default_value = "auto")]
    pub format: String,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,

    /// Input file path (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Read from stdin
    #[arg(long)]
    pub stdin: bool,
}

#[derive(clap::Args, Debug)]
pub struct RangeArgs {
    /// IANA timezone; defaults to TZ or the system zone
    #[arg(short, long, env = "DAYCLOCK_TZ")]
    pub tz: Option<String>,

    /// Last N local days up to and including today
    #[arg(long, allow_negative_numbers = true, conflicts_with_all = ["date", "from", "to"])]
    pub days: Option<i64>,

    /// A single local date (dd/MM/yyyy or yyyy-MM-dd)
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub date: Option<String>,

    /// First local date of a custom window (inclusive)
    #[arg(long, requires = "to")]
    pub from: Option<String>,

    /// Last local date of a custom window (inclusive)
    #[arg(long, requires = "from")]
    pub to: Option<String>,

    /// Current instant (RFC3339) used instead of the system clock
    #[arg(long)]
    pub now: Option<String>,

    /// List every local day in the window
    #[arg(long)]
    pub list_days: bool,

    /// Output format: json, text
    #[arg(long, default_value = "json")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct GroupArgs {
    /// IANA timezone; defaults to TZ or the system zone
    #[arg(short, long, env = "DAYCLOCK_TZ")]
    pub tz: Option<String>,

    /// Abort on the first malformed line instead of skipping it
    #[arg(long)]
    pub strict: bool,

    /// Output format: json, text
    #[arg(long, default_value = "json")]
    pub output_format: String,

    /// Input file path (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Read from stdin
    #[arg(long)]
    pub stdin: bool,
}

#[derive(clap::Args, Debug)]
pub struct ExplainArgs {
    /// IANA timezone; defaults to TZ or the system zone
    #[arg(short, long, env = "DAYCLOCK_TZ")]
    pub tz: Option<String>,

    /// Local time string (without offset, e.g., 2026-03-29T02:30:00)
    #[arg(long)]
    pub local: String,

    /// Output format: json, text
    #[arg(long, default_value = "json")]
    pub output_format: String,
}

#[derive(clap::Args, Debug)]
pub struct FormatArgs {
    /// IANA timezone; defaults to TZ or the system zone
    #[arg(short, long, env = "DAYCLOCK_TZ")]
    pub tz: Option<String>,

    /// BCP-47 locale (e.g., pl-PL); defaults to LC_ALL, LC_TIME or LANG
    #[arg(short, long, env = "DAYCLOCK_LOCALE")]
    pub locale: Option<String>,

    /// Display style: date, datetime
    #[arg(long, default_value = "date")]
    pub style: String,

    /// Input format: epoch_ms, epoch_s, rfc3339, auto
    #[arg(short = 'f', long, default_value = "auto")]
    pub format: String,

    /// Output format: json, text
    #[arg(long, default_value = "text")]
    pub output_format: String,

    /// Input file path (use - for stdin)
    #[arg(long, default_value = "-")]
    pub input: String,

    /// Read from stdin
    #[arg(long)]
    pub stdin: bool,
}
