// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

use crate::types::ConcurrencyLimit;

/// Command-line arguments for `dynbuild`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "dynbuild",
    version,
    about = "Run build targets as rounds of dependency-ordered tasks.",
    long_about = None
)]
pub struct CliArgs {
    /// Log task start/finish with timings.
    #[arg(short, long)]
    pub verbose: bool,

    /// Maximum number of tasks started per round (`0` or `unbounded` for
    /// no limit).
    ///
    /// Overrides `[project].concurrency`.
    #[arg(short = 'j', long, value_name = "N")]
    pub concurrency: Option<ConcurrencyLimit>,

    /// Path to the config file (TOML).
    #[arg(long, value_name = "PATH", default_value = "Dynbuild.toml")]
    pub config: String,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `DYNBUILD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Target to run (default: `[project].default_target`), then arguments
    /// for its tasks.
    ///
    /// Options are only read before the target; everything after it is
    /// passed through untouched.
    #[arg(
        value_name = "TARGET [ARGS]",
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub invocation: Vec<String>,
}

impl CliArgs {
    pub fn target(&self) -> Option<&str> {
        self.invocation.first().map(String::as_str)
    }

    pub fn target_args(&self) -> &[String] {
        self.invocation.get(1..).unwrap_or(&[])
    }
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
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
