// src/task/ordered.rs

//! Attach static ordering (`after` / `before`) to any task.

use super::{BoxFuture, Capabilities, Task, TaskContext, TaskOutput};
use crate::project::ProjectOptions;

/// Wraps a task with fixed prerequisite (`after`) and postrequisite
/// (`before`) lists. This is how config-defined tasks get their ordering.
#[derive(Debug, Clone)]
pub struct Ordered<T> {
    inner: T,
    after: Vec<String>,
    before: Vec<String>,
}

impl<T: Task> Ordered<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            after: Vec::new(),
            before: Vec::new(),
        }
    }

    pub fn after<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.after.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn before<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.before.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn inner(&self) -> &T {
        &self.inner
    }
}

impl<T: Task> Task for Ordered<T> {
    fn name(&self) -> Option<&str> {
        self.inner.name()
    }

    fn capabilities(&self) -> Capabilities {
        let mut caps = self.inner.capabilities();
        if !self.after.is_empty() {
            caps = caps.with_prerequisites();
        }
        if !self.before.is_empty() {
            caps = caps.with_postrequisites();
        }
        caps
    }

    fn prerequisites(&self, options: &ProjectOptions) -> Vec<String> {
        let mut keys = self.inner.prerequisites(options);
        keys.extend(self.after.iter().cloned());
        keys
    }

    fn postrequisites(&self, options: &ProjectOptions) -> Vec<String> {
        let mut keys = self.inner.postrequisites(options);
        keys.extend(self.before.iter().cloned());
        keys
    }

    fn run(&self, ctx: TaskContext) -> BoxFuture<'_, TaskOutput> {
        self.inner.run(ctx)
    }
}

/// A task with no body. Only useful wrapped in [`Ordered`] with a `before`
/// list, to pin ordering between other tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anchor;

impl Task for Anchor {
    fn capabilities(&self) -> Capabilities {
        Capabilities::NONE
    }
}
