// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

use crate::project::{DEFAULT_BUILD_DIR, DEFAULT_TARGET};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [project]
/// build_dir = "build"
/// source_dirs = ["src"]
///
/// [target.build.task.compile]
/// cmd = "cc -c main.c"
/// before = ["link"]
/// ```
///
/// All sections are optional. Use [`ConfigFile`] (via `TryFrom`) to get a
/// validated view.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub project: ProjectSection,

    /// All targets from `[target.<name>]`.
    #[serde(default)]
    pub target: BTreeMap<String, TargetConfig>,
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (or
/// [`ConfigFile::new_unchecked`] by the validator itself).
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    project: ProjectSection,
    targets: BTreeMap<String, TargetConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        project: ProjectSection,
        targets: BTreeMap<String, TargetConfig>,
    ) -> Self {
        Self { project, targets }
    }

    pub fn project(&self) -> &ProjectSection {
        &self.project
    }

    pub fn targets(&self) -> &BTreeMap<String, TargetConfig> {
        &self.targets
    }
}

/// `[project]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    #[serde(default = "default_build_dir")]
    pub build_dir: PathBuf,

    #[serde(default)]
    pub source_dirs: Vec<PathBuf>,

    #[serde(default)]
    pub include_dirs: Vec<PathBuf>,

    #[serde(default)]
    pub source_files: Vec<PathBuf>,

    /// Target run when none is given on the command line.
    #[serde(default = "default_target")]
    pub default_target: String,

    /// Maximum tasks per round; unset means unbounded. `-j` overrides it.
    #[serde(default)]
    pub concurrency: Option<usize>,
}

fn default_build_dir() -> PathBuf {
    PathBuf::from(DEFAULT_BUILD_DIR)
}

fn default_target() -> String {
    DEFAULT_TARGET.to_string()
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            build_dir: default_build_dir(),
            source_dirs: Vec::new(),
            include_dirs: Vec::new(),
            source_files: Vec::new(),
            default_target: default_target(),
            concurrency: None,
        }
    }
}

/// `[target.<name>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    /// Shown by the `help` target.
    #[serde(default)]
    pub help: String,

    /// Tasks from `[target.<name>.task.<key>]`, keyed by graph key.
    #[serde(default)]
    pub task: BTreeMap<String, TaskConfig>,
}

/// `[target.<name>.task.<key>]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskConfig {
    /// Shell command to execute.
    #[serde(default)]
    pub cmd: Option<String>,

    /// Prerequisites: this task waits for all tasks listed here. A trailing
    /// `?` marks a key as optional.
    #[serde(default)]
    pub after: Vec<String>,

    /// Postrequisites: the listed tasks wait for this one.
    #[serde(default)]
    pub before: Vec<String>,

    /// Yield one command task per matching source file.
    #[serde(default)]
    pub discover: Option<DiscoverConfig>,
}

/// `discover = { pattern = "...", cmd = "..." }`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoverConfig {
    /// Glob matched against project-relative source paths.
    pub pattern: String,

    /// Command template; see [`crate::task::discover::render_template`].
    pub cmd: String,

    /// Key prefix for yielded tasks; defaults to `"<task key>:"`.
    #[serde(default)]
    pub prefix: Option<String>,

    /// Prerequisites of every yielded task.
    #[serde(default)]
    pub after: Vec<String>,

    /// Postrequisites of every yielded task.
    #[serde(default)]
    pub before: Vec<String>,
}
