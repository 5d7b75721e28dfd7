//! CLI argument definitions for the DQI tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "edc-dqi",
    version,
    about = "EDC Data Quality Index - per-subject quality scoring for clinical studies",
    long_about = "Consolidate a study's EDC report exports into per-subject quality\n\
                  assessments: a weighted Data Quality Index with 5-tier categorization\n\
                  and an 11-criterion clean/not-clean classification, persisted to SQLite."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

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
    /// Process a study directory and persist quality results.
    Run(RunArgs),

    /// List the scored dimensions with their default thresholds and weights.
    Dimensions,
}

#[derive(Parser)]
pub struct RunArgs {
    /// Path to the study directory containing the CSV report exports.
    #[arg(value_name = "STUDY_DIR")]
    pub study_dir: PathBuf,

    /// Threshold/weight configuration JSON (defaults to built-in values).
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Results database path (default: <STUDY_DIR>/dqi.db).
    #[arg(long = "db", value_name = "FILE")]
    pub db: Option<PathBuf>,
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
