// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `pipedag`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pipedag",
    version,
    about = "Check pipeline graphs for cycles, over HTTP or from a file.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Pipedag.toml` in the current working directory if it exists,
    /// otherwise built-in defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Listen address, overriding `[server].bind`.
    #[arg(long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Validate a JSON payload file, print the result and exit.
    #[arg(long, value_name = "PATH")]
    pub check: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PIPEDAG_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Load + validate config, print effective settings, don't serve.
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
