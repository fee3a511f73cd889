// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `logwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "logwatch",
    version,
    about = "Run a command when a byte pattern shows up in a (rotating) log file.",
    long_about = None
)]
pub struct CliArgs {
    /// Byte pattern to look for (exact match, no regex).
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Command to execute on a match. Run without arguments.
    #[arg(value_name = "COMMAND")]
    pub command: PathBuf,

    /// Log file to watch, e.g. /var/log/syslog. Must contain a directory.
    #[arg(value_name = "LOGFILE")]
    pub logfile: String,

    /// Optional TOML config file with `[watch]` tuning.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Bytes per read; overrides `watch.chunk_size` from the config file.
    #[arg(long, value_name = "BYTES")]
    pub chunk_size: Option<usize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `LOGWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate inputs and print the resolved setup without watching.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
