// src/target.rs

//! Build targets: named producers of task sets.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::config::model::{TargetConfig, TaskConfig};
use crate::errors::{BuildError, Result};
use crate::fs::FileSystem;
use crate::project::ProjectOptions;
use crate::task::{
    Anchor, CleanTask, CommandTask, DiscoverTask, HelpTask, Ordered, TaskSet,
};

/// Target whose tasks are merged into every other target's tasks.
pub const ALL_TARGET: &str = "_all";
pub const CLEAN_TARGET: &str = "clean";
pub const HELP_TARGET: &str = "help";

/// A selectable build target.
pub trait Target: Send + Sync {
    /// One-line description shown by `help`.
    fn help_message(&self) -> &str {
        ""
    }

    /// Tasks to schedule when this target is selected.
    fn tasks(&self, options: &ProjectOptions) -> Result<TaskSet>;
}

/// Target with a fixed task set; used for config-defined targets.
#[derive(Debug, Clone, Default)]
pub struct StaticTarget {
    help: String,
    tasks: TaskSet,
}

impl StaticTarget {
    pub fn new(help: impl Into<String>, tasks: TaskSet) -> Self {
        Self {
            help: help.into(),
            tasks,
        }
    }

    /// Build a target from its `[target.<name>]` section.
    pub fn from_config(cfg: &TargetConfig, fs: &Arc<dyn FileSystem>) -> Result<Self> {
        let mut tasks = TaskSet::new();
        for (key, task) in cfg.task.iter() {
            add_configured_task(&mut tasks, key, task, fs)?;
        }
        Ok(Self::new(cfg.help.clone(), tasks))
    }
}

fn add_configured_task(
    tasks: &mut TaskSet,
    key: &str,
    cfg: &TaskConfig,
    fs: &Arc<dyn FileSystem>,
) -> Result<()> {
    let after = cfg.after.iter().cloned();
    let before = cfg.before.iter().cloned();

    match (&cfg.cmd, &cfg.discover) {
        (Some(cmd), None) => {
            tasks.insert(key, Ordered::new(CommandTask::new(cmd)).after(after).before(before));
        }
        (None, Some(discover)) => {
            let prefix = discover
                .prefix
                .clone()
                .unwrap_or_else(|| format!("{key}:"));
            let task = DiscoverTask::new(&discover.pattern, &discover.cmd, prefix, Arc::clone(fs))
                .map_err(|e| BuildError::ConfigError(format!("task '{key}': {e:#}")))?
                .yielded_after(discover.after.clone())
                .yielded_before(discover.before.clone());
            tasks.insert(key, Ordered::new(task).after(after).before(before));
        }
        (None, None) => {
            tasks.insert(key, Ordered::new(Anchor).after(after).before(before));
        }
        (Some(_), Some(_)) => {
            return Err(BuildError::ConfigError(format!(
                "task '{key}' sets both `cmd` and `discover`"
            )));
        }
    }
    Ok(())
}

impl Target for StaticTarget {
    fn help_message(&self) -> &str {
        &self.help
    }

    fn tasks(&self, _options: &ProjectOptions) -> Result<TaskSet> {
        Ok(self.tasks.clone())
    }
}

/// `clean`: delete the build directory.
#[derive(Debug, Clone)]
pub struct CleanTarget {
    fs: Arc<dyn FileSystem>,
}

impl CleanTarget {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl Target for CleanTarget {
    fn help_message(&self) -> &str {
        "deletes build directory"
    }

    fn tasks(&self, _options: &ProjectOptions) -> Result<TaskSet> {
        Ok(TaskSet::new().with(CLEAN_TARGET, CleanTask::new(Arc::clone(&self.fs))))
    }
}

/// `help`: list targets.
#[derive(Debug, Clone)]
pub struct HelpTarget {
    listing: Vec<(String, String)>,
}

impl Target for HelpTarget {
    fn help_message(&self) -> &str {
        "print help"
    }

    fn tasks(&self, _options: &ProjectOptions) -> Result<TaskSet> {
        Ok(TaskSet::new().with(HELP_TARGET, HelpTask::new(self.listing.clone())))
    }
}

/// All known targets, sorted by name.
#[derive(Clone, Default)]
pub struct TargetRegistry {
    targets: BTreeMap<String, Arc<dyn Target>>,
}

impl fmt::Debug for TargetRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.targets.keys()).finish()
    }
}

impl TargetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, target: impl Target + 'static) {
        self.targets.insert(name.into(), Arc::new(target));
    }

    pub fn with(mut self, name: impl Into<String>, target: impl Target + 'static) -> Self {
        self.insert(name, target);
        self
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Target>> {
        self.targets.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.targets.contains_key(name)
    }

    pub fn names(&self) -> Vec<String> {
        self.targets.keys().cloned().collect()
    }

    /// `(name, help message)` for every target.
    pub fn listing(&self) -> Vec<(String, String)> {
        self.targets
            .iter()
            .map(|(name, target)| (name.clone(), target.help_message().to_string()))
            .collect()
    }

    /// Add `clean` and `help` unless already defined.
    ///
    /// `help` lists the registry as it is at this point, itself included.
    pub fn install_builtins(&mut self, fs: Arc<dyn FileSystem>) {
        if !self.contains(CLEAN_TARGET) {
            self.insert(CLEAN_TARGET, CleanTarget::new(fs));
        }
        if !self.contains(HELP_TARGET) {
            let mut listing = self.listing();
            listing.push((HELP_TARGET.to_string(), "print help".to_string()));
            self.insert(HELP_TARGET, HelpTarget { listing });
        }
    }
}
