// src/project.rs

//! Build context shared (read-only) with every task invocation.

use std::path::{Path, PathBuf};

use crate::config::ConfigFile;
use crate::types::ConcurrencyLimit;

pub const DEFAULT_TARGET: &str = "build";
pub const DEFAULT_BUILD_DIR: &str = "build";

/// Project-wide options resolved from config + CLI.
///
/// Relative paths are interpreted against `project_dir`; use
/// [`ProjectOptions::resolve`] when touching the filesystem.
#[derive(Debug, Clone)]
pub struct ProjectOptions {
    pub project_dir: PathBuf,
    pub build_dir: PathBuf,
    pub source_files: Vec<PathBuf>,
    pub source_dirs: Vec<PathBuf>,
    pub include_dirs: Vec<PathBuf>,
    /// Name of the target selected for this invocation.
    pub target: String,
    /// Arguments after the target name on the command line.
    pub target_args: Vec<String>,
    pub concurrency: ConcurrencyLimit,
    pub verbose: bool,
}

impl Default for ProjectOptions {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::from("."),
            build_dir: PathBuf::from(DEFAULT_BUILD_DIR),
            source_files: Vec::new(),
            source_dirs: Vec::new(),
            include_dirs: Vec::new(),
            target: DEFAULT_TARGET.to_string(),
            target_args: Vec::new(),
            concurrency: ConcurrencyLimit::Unbounded,
            verbose: false,
        }
    }
}

impl ProjectOptions {
    /// Options for a project rooted at `project_dir` with defaults applied
    /// from the `[project]` section.
    pub fn from_config(cfg: &ConfigFile, project_dir: impl Into<PathBuf>) -> Self {
        let project = cfg.project();
        Self {
            project_dir: project_dir.into(),
            build_dir: project.build_dir.clone(),
            source_files: project.source_files.clone(),
            source_dirs: project.source_dirs.clone(),
            include_dirs: project.include_dirs.clone(),
            target: project.default_target.clone(),
            target_args: Vec::new(),
            concurrency: ConcurrencyLimit::from_option(project.concurrency),
            verbose: false,
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    pub fn with_concurrency(mut self, concurrency: ConcurrencyLimit) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Join a (possibly relative) path onto the project directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.project_dir.join(path)
        }
    }

    /// Absolute (or project-relative) location of the build directory.
    pub fn build_path(&self) -> PathBuf {
        self.resolve(&self.build_dir)
    }
}
