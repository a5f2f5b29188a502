//! Clap derive structures for the `crux` CLI.
//!
//! Defines the command tree, global flags, and shared value enums. Kept free
//! of workspace types so `build.rs` can compile it on its own.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// crux -- Chrome UX Report metrics for one or more URLs
#[derive(Debug, Parser)]
#[command(
    name = "crux",
    version,
    about = "Fetch and compare Chrome UX Report metrics",
    long_about = "Query the Chrome UX Report (CrUX) API for real-user performance\n\
        metrics of one or more URLs, then filter, sort, and page through the\n\
        results with aggregate statistics.\n\n\
        Without an API key, crux produces randomly generated sample data.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// CrUX API key
    #[arg(long, env = "CRUX_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Ignore any configured API key and use sample data
    #[arg(long, global = true)]
    pub synthetic: bool,

    /// Override the CrUX queryRecord endpoint
    #[arg(long, env = "CRUX_ENDPOINT", global = true)]
    pub endpoint: Option<String>,

    /// Device class to query
    #[arg(long, short = 'f', env = "CRUX_FORM_FACTOR", global = true)]
    pub form_factor: Option<FormFactorArg>,

    /// Output format
    #[arg(long, short = 'o', env = "CRUX_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "CRUX_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Value Enums ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormFactorArg {
    Phone,
    Desktop,
    Tablet,
    /// Aggregate over every device class
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OperatorArg {
    /// Greater than
    Gt,
    /// Less than
    Lt,
    /// Equal to
    Eq,
    /// Greater than or equal to
    Gte,
    /// Less than or equal to
    Lte,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch metrics for URLs and show them as a filtered, sorted table
    #[command(alias = "q")]
    Query(QueryArgs),

    /// Show the metric reference: units, thresholds, descriptions
    Metrics,

    /// Classify a single metric value
    Rate(RateArgs),

    /// Manage CLI configuration and the stored API key
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Query ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct QueryArgs {
    /// URLs to query (absolute, e.g. https://example.com/)
    pub urls: Vec<String>,

    /// Read additional URLs from a file, one per line (`#` starts a comment)
    #[arg(long, value_name = "PATH")]
    pub from_file: Option<PathBuf>,

    /// Metric to filter on, or `all` for no filter
    #[arg(
        long,
        short = 'm',
        default_value = "all",
        value_parser = clap::builder::PossibleValuesParser::new(
            ["all", "lcp", "fid", "cls", "fcp", "ttfb", "inp"]
        ),
        ignore_case = true
    )]
    pub metric: String,

    /// Comparison applied as `<metric> <op> <value>`
    #[arg(long, default_value = "gt")]
    pub op: OperatorArg,

    /// Filter threshold; non-numeric input disables the filter
    #[arg(long, allow_hyphen_values = true)]
    pub value: Option<String>,

    /// Sort by `url` or a metric name (input order if omitted)
    #[arg(
        long,
        short = 's',
        value_parser = clap::builder::PossibleValuesParser::new(
            ["url", "lcp", "fid", "cls", "fcp", "ttfb", "inp"]
        ),
        ignore_case = true
    )]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Page to show (0-based)
    #[arg(long, default_value = "0")]
    pub page: usize,

    /// Rows per page [default: from config]
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub page_size: Option<u16>,
}

// ── Rate ─────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct RateArgs {
    /// Metric name (lcp, fid, cls, fcp, ttfb, inp)
    pub metric: String,

    /// Measured value (milliseconds, or unitless for cls)
    #[arg(allow_hyphen_values = true)]
    pub value: f64,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Interactive configuration wizard
    Init,

    /// Show the effective configuration (secrets redacted)
    Show,

    /// Print the config file path
    Path,

    /// Set a config value
    Set {
        /// Key (api_key_env, endpoint, form_factor, ca_cert, output, color, timeout, page_size)
        key: String,
        /// Value
        value: String,
    },

    /// Store the API key in the system keyring
    SetKey,

    /// Remove the API key from the system keyring
    ClearKey,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
