// src/engine/orchestrator.rs

use std::sync::Arc;

use tracing::{debug, info};

use crate::config::ConfigFile;
use crate::dag::{BuildReport, Scheduler};
use crate::errors::{BuildError, Result};
use crate::exec::{ExecutorBackend, TokioExecutor};
use crate::fs::FileSystem;
use crate::project::ProjectOptions;
use crate::target::{ALL_TARGET, StaticTarget, TargetRegistry};
use crate::task::TaskSet;

use super::runtime::Runtime;

/// Entry point for running a named target.
///
/// Owns the target registry (config targets plus built-ins) and the
/// filesystem used by built-in tasks.
#[derive(Debug)]
pub struct Orchestrator {
    targets: TargetRegistry,
    fs: Arc<dyn FileSystem>,
}

impl Orchestrator {
    /// Wrap `targets`, adding `clean` and `help` where not user-defined.
    pub fn new(mut targets: TargetRegistry, fs: Arc<dyn FileSystem>) -> Self {
        targets.install_builtins(Arc::clone(&fs));
        Self { targets, fs }
    }

    pub fn from_config(cfg: &ConfigFile, fs: Arc<dyn FileSystem>) -> Result<Self> {
        let mut targets = TargetRegistry::new();
        for (name, target) in cfg.targets() {
            targets.insert(name.clone(), StaticTarget::from_config(target, &fs)?);
        }
        Ok(Self::new(targets, fs))
    }

    pub fn targets(&self) -> &TargetRegistry {
        &self.targets
    }

    /// Create the build directory.
    pub fn init(&self, options: &ProjectOptions) -> Result<()> {
        let build_path = options.build_path();
        debug!(path = %build_path.display(), "ensuring build directory");
        self.fs.create_dir_all(&build_path)?;
        Ok(())
    }

    /// Tasks for `options.target`: the `_all` tasks first, then the target's
    /// own, which win on name clashes.
    pub fn resolve_tasks(&self, options: &ProjectOptions) -> Result<TaskSet> {
        let target = self
            .targets
            .get(&options.target)
            .ok_or_else(|| BuildError::UnknownTarget {
                target: options.target.clone(),
                available: self.targets.names(),
            })?;

        let mut tasks = match self.targets.get(ALL_TARGET) {
            Some(all) if options.target != ALL_TARGET => all.tasks(options)?,
            _ => TaskSet::new(),
        };
        tasks.extend(target.tasks(options)?);
        Ok(tasks)
    }

    pub async fn run_target(&self, options: ProjectOptions) -> Result<BuildReport> {
        self.run_target_with(options, TokioExecutor::new()).await
    }

    /// Run the selected target on `executor`.
    pub async fn run_target_with<E: ExecutorBackend>(
        &self,
        options: ProjectOptions,
        executor: E,
    ) -> Result<BuildReport> {
        let tasks = self.resolve_tasks(&options)?;
        self.init(&options)?;

        info!(target = %options.target, tasks = tasks.len(), "running target");
        let scheduler = Scheduler::from_tasks(Arc::new(options), tasks)?;
        Runtime::new(scheduler, executor).run().await
    }
}
