// src/lib.rs

pub mod cli;
pub mod config;
pub mod dag;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod project;
pub mod target;
pub mod task;
pub mod types;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::cli::CliArgs;
use crate::config::loader::load_or_default;
use crate::dag::BuildReport;
use crate::engine::Orchestrator;
use crate::errors::Result;
use crate::fs::RealFileSystem;
use crate::project::ProjectOptions;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - project options (config defaults, then CLI overrides)
/// - target registry and built-ins
/// - the round runtime on the Tokio executor
pub async fn run(args: CliArgs) -> Result<BuildReport> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_or_default(&config_path)?;

    let options = project_options(&cfg, &config_path, &args);
    debug!(?options, "resolved project options");

    let orchestrator = Orchestrator::from_config(&cfg, Arc::new(RealFileSystem))?;
    orchestrator.run_target(options).await
}

/// Merge the config's `[project]` section with command-line overrides.
pub fn project_options(
    cfg: &config::ConfigFile,
    config_path: &Path,
    args: &CliArgs,
) -> ProjectOptions {
    let mut options = ProjectOptions::from_config(cfg, config_root_dir(config_path))
        .with_verbose(args.verbose);
    if let Some(target) = args.target() {
        options = options.with_target(target);
    }
    if let Some(limit) = args.concurrency {
        options = options.with_concurrency(limit);
    }
    options.target_args = args.target_args().to_vec();
    options
}

/// Directory containing the config file, or `.` for a bare filename.
fn config_root_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
