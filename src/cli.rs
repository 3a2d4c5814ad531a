// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `wormhole`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "wormhole",
    version = crate::version(),
    about = "Local daemon that opens files from sandboxed environments with native host tools.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `.wormhole.toml` in the home directory.
    #[arg(long, value_name = "PATH")]
    pub configfile: Option<PathBuf>,

    /// Path to the log file used in quiet mode.
    ///
    /// Default: `wormhole.log` in the home directory.
    #[arg(long, value_name = "PATH")]
    pub log: Option<PathBuf>,

    /// Log to the log file instead of stdout.
    #[arg(long)]
    pub quiet: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `WORMHOLE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Expose the bound address to the wrapped command via `:environment`
    /// or a file at the given path.
    #[arg(long, value_name = "MODE", default_value = ":environment")]
    pub inject: String,

    /// Optional command to run under wormhole supervision.
    ///
    /// When given, the server runs in the background and wormhole exits
    /// when this command does.
    #[arg(trailing_var_arg = true, value_name = "COMMAND")]
    pub command: Vec<String>,
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
