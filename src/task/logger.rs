// src/task/logger.rs

//! Per-task logging handle.
//!
//! Every line goes through `tracing` with a `task` field, so concurrent
//! tasks never interleave inside a single line.

use std::fmt::Display;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct TaskLogger {
    task: Arc<str>,
}

impl TaskLogger {
    pub fn new(task: impl Into<Arc<str>>) -> Self {
        Self { task: task.into() }
    }

    /// Name this logger tags its lines with.
    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn debug(&self, message: impl Display) {
        debug!(task = %self.task, "{message}");
    }

    pub fn info(&self, message: impl Display) {
        info!(task = %self.task, "{message}");
    }

    pub fn warn(&self, message: impl Display) {
        warn!(task = %self.task, "{message}");
    }

    pub fn error(&self, message: impl Display) {
        error!(task = %self.task, "{message}");
    }
}
