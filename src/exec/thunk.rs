// src/exec/thunk.rs

//! The execution closure stored in every graph entry.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::errors::{BuildError, Result};
use crate::project::ProjectOptions;
use crate::task::{Task, TaskContext, TaskLogger, TaskSet};
use crate::types::TaskName;

/// Zero-argument handle that runs one task with logging, timing and error
/// wrapping around [`Task::run`].
///
/// Constructing a thunk validates the task; that is where `InvalidTask`
/// comes from.
#[derive(Clone)]
pub struct TaskThunk {
    key: TaskName,
    display: TaskName,
    task: Arc<dyn Task>,
    options: Arc<ProjectOptions>,
}

impl fmt::Debug for TaskThunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskThunk")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl TaskThunk {
    pub fn new(key: &str, task: Arc<dyn Task>, options: Arc<ProjectOptions>) -> Result<Self> {
        if !task.capabilities().is_valid() {
            return Err(BuildError::InvalidTask {
                key: key.to_string(),
            });
        }
        let display = task.name().unwrap_or(key).to_string();
        Ok(Self {
            key: key.to_string(),
            display,
            task,
            options,
        })
    }

    /// Graph key of the task.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Name used in log lines.
    pub fn display_name(&self) -> &str {
        &self.display
    }

    /// Run the task to completion.
    ///
    /// Returns the tasks it yielded, if any. Failures are wrapped in
    /// [`BuildError::TaskExecutionFailure`] carrying the graph key.
    pub async fn invoke(self) -> Result<Option<TaskSet>> {
        let log = TaskLogger::new(self.display.as_str());
        let verbose = self.options.verbose;
        let ctx = TaskContext {
            options: Arc::clone(&self.options),
            log: log.clone(),
        };

        let started = Instant::now();
        if verbose {
            log.debug("begin");
        }

        let output = if self.task.capabilities().run {
            self.task.run(ctx).await
        } else {
            Ok(None)
        };

        match output {
            Ok(yielded) => {
                if verbose {
                    log.debug(format!("end (time: {}ms)", started.elapsed().as_millis()));
                }
                Ok(yielded)
            }
            Err(source) => Err(BuildError::TaskExecutionFailure {
                task: self.key,
                source,
            }),
        }
    }
}
