// src/task/mod.rs

//! The unit-of-work contract and the stock task implementations.
//!
//! - [`Task`] is the trait every unit of work implements.
//! - [`TaskSet`] is an ordered name -> task mapping; it is both the input to
//!   the scheduler and what a running task may yield to grow the graph.
//! - [`TaskLogger`] is the per-task logging handle passed in [`TaskContext`].
//! - [`command`], [`discover`], [`builtin`] and [`ordered`] hold the concrete
//!   tasks used by config-defined and built-in targets.

pub mod builtin;
pub mod command;
pub mod discover;
pub mod logger;
pub mod ordered;
pub mod set;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::project::ProjectOptions;

pub use builtin::{CleanTask, HelpTask, NopTask};
pub use command::CommandTask;
pub use discover::DiscoverTask;
pub use logger::TaskLogger;
pub use ordered::{Anchor, Ordered};
pub use set::TaskSet;

/// Boxed, sendable future as returned by [`Task::run`].
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// What a task's run produces: nothing, or new tasks to merge into the graph.
pub type TaskOutput = anyhow::Result<Option<TaskSet>>;

/// Which optional behaviours a task supplies.
///
/// Only used to validate a task on registration: it must run or report
/// `postrequisites: true`. Ordering is always read from
/// [`Task::prerequisites`] and [`Task::postrequisites`], whatever the flags say.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub run: bool,
    pub prerequisites: bool,
    pub postrequisites: bool,
}

impl Capabilities {
    /// Runs, declares no ordering.
    pub const RUN: Capabilities = Capabilities {
        run: true,
        prerequisites: false,
        postrequisites: false,
    };

    /// Declares nothing and does nothing.
    pub const NONE: Capabilities = Capabilities {
        run: false,
        prerequisites: false,
        postrequisites: false,
    };

    pub const fn with_prerequisites(mut self) -> Self {
        self.prerequisites = true;
        self
    }

    pub const fn with_postrequisites(mut self) -> Self {
        self.postrequisites = true;
        self
    }

    /// A task must either run or order some other task.
    pub const fn is_valid(&self) -> bool {
        self.run || self.postrequisites
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Capabilities::RUN
    }
}

/// Everything a task body receives when it runs.
#[derive(Debug, Clone)]
pub struct TaskContext {
    pub options: Arc<ProjectOptions>,
    pub log: TaskLogger,
}

/// A named unit of work.
///
/// Implementations are immutable descriptors: the scheduler may call
/// `prerequisites`/`postrequisites` many times (once per round) and `run`
/// at most once per registration.
pub trait Task: Send + Sync + 'static {
    /// Display name used in logs; defaults to the graph key.
    fn name(&self) -> Option<&str> {
        None
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::RUN
    }

    /// Keys that must be complete before this task may start.
    ///
    /// A trailing `?` marks a key as optional; see
    /// [`crate::dag::prerequisite::Prerequisite`].
    fn prerequisites(&self, _options: &ProjectOptions) -> Vec<String> {
        Vec::new()
    }

    /// Keys of other tasks that must wait for this one.
    fn postrequisites(&self, _options: &ProjectOptions) -> Vec<String> {
        Vec::new()
    }

    fn run(&self, _ctx: TaskContext) -> BoxFuture<'_, TaskOutput> {
        Box::pin(async { Ok(None) })
    }
}
