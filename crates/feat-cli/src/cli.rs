//! CLI argument definitions for the feature pipeline.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use feat_cli::sample::{DEFAULT_ROWS, DEFAULT_SEED};

#[derive(Parser)]
#[command(
    name = "feat-pipeline",
    version,
    about = "Feature engineering pipeline - derive, encode, bin, expand and flag tabular data",
    long_about = "Run every CSV file of an input folder through five feature stages:\n\
                  computed columns, categorical encoding, range binning, temporal\n\
                  features and anomaly flags. Results are written as CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Process every CSV file in the input folder.
    Run(RunArgs),

    /// Write a synthetic sample dataset.
    Generate(GenerateArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Folder scanned for `*.csv` files (created when missing).
    #[arg(long = "input-dir", value_name = "DIR", default_value = "input")]
    pub input_dir: PathBuf,

    /// Folder receiving intermediate and final tables.
    #[arg(long = "output-dir", value_name = "DIR", default_value = "output")]
    pub output_dir: PathBuf,

    /// Only write `<name>_FINAL.csv`, not the per-stage tables.
    #[arg(long = "no-intermediates")]
    pub no_intermediates: bool,

    /// Absolute Z-score above which a value is an outlier.
    #[arg(long = "zscore-threshold", value_name = "SIGMA", default_value_t = 3.0)]
    pub zscore_threshold: f64,

    /// IQR multiplier for the Tukey fences.
    #[arg(long = "iqr-multiplier", value_name = "K", default_value_t = 1.5)]
    pub iqr_multiplier: f64,

    /// Timestamps at most this many days old are marked recent.
    #[arg(long = "recent-days", value_name = "DAYS", default_value_t = 30)]
    pub recent_days: i64,

    /// Evaluate relative-time features against this date instead of today.
    #[arg(long = "reference-date", value_name = "YYYY-MM-DD")]
    pub reference_date: Option<NaiveDate>,

    /// Write the sample dataset into the input folder before scanning.
    #[arg(long = "generate-sample")]
    pub generate_sample: bool,
}

#[derive(Parser)]
pub struct GenerateArgs {
    /// Destination CSV file.
    #[arg(long = "output", value_name = "PATH", default_value = "input/sample_data.csv")]
    pub output: PathBuf,

    /// Number of rows.
    #[arg(long = "rows", default_value_t = DEFAULT_ROWS)]
    pub rows: usize,

    /// Random seed.
    #[arg(long = "seed", default_value_t = DEFAULT_SEED)]
    pub seed: u64,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
