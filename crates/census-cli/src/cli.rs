//! CLI argument definitions for the census record manager.

use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "census",
    version,
    about = "Census record manager - validate and store person records",
    long_about = "Manage census person records.\n\n\
                  Candidate records are checked against the full rule set \
                  (id checksums, age, conditional requirements, worker \
                  consistency) and every violation is reported at once."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
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
    /// Validate a candidate record file without storing it.
    Validate(ValidateArgs),

    /// Validate a candidate record file and add it to the store.
    Add(AddArgs),

    /// List stored records.
    List(DataDirArgs),

    /// Print a stored record as JSON.
    Show(RecordArgs),

    /// Remove a stored record.
    Remove(RecordArgs),

    /// Export stored records to a CSV file.
    Export(ExportArgs),

    /// Serve the HTTP API.
    Serve(ServeArgs),
}

#[derive(Parser)]
pub struct ValidateArgs {
    /// Path to a JSON candidate record.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,
}

#[derive(Parser)]
pub struct AddArgs {
    /// Path to a JSON candidate record.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Directory holding the record store.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "census-data")]
    pub data_dir: PathBuf,
}

#[derive(Parser)]
pub struct DataDirArgs {
    /// Directory holding the record store.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "census-data")]
    pub data_dir: PathBuf,
}

#[derive(Parser)]
pub struct RecordArgs {
    /// Record id (lowercase hex, as shown by `list`).
    #[arg(value_name = "ID")]
    pub id: String,

    /// Directory holding the record store.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "census-data")]
    pub data_dir: PathBuf,
}

#[derive(Parser)]
pub struct ExportArgs {
    /// Output CSV path.
    #[arg(long = "output", value_name = "FILE", default_value = "persons.csv")]
    pub output: PathBuf,

    /// Directory holding the record store.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "census-data")]
    pub data_dir: PathBuf,
}

#[derive(Parser)]
pub struct ServeArgs {
    /// Address to bind the HTTP API on.
    #[arg(long = "addr", value_name = "ADDR", default_value = "127.0.0.1:8080")]
    pub addr: SocketAddr,

    /// Directory holding the record store.
    #[arg(long = "data-dir", value_name = "DIR", default_value = "census-data")]
    pub data_dir: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
