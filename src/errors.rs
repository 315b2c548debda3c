// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::dag::diagnostics::UnresolvedReport;
use crate::types::TaskName;

#[derive(Error, Debug)]
pub enum BuildError {
    /// A task supplies neither a run behaviour nor postrequisites.
    #[error("Invalid task: {key}")]
    InvalidTask { key: TaskName },

    /// A task's run operation returned an error (or panicked).
    #[error("Task \"{task}\" failed: {source}")]
    TaskExecutionFailure {
        task: TaskName,
        #[source]
        source: anyhow::Error,
    },

    #[error("Unknown target \"{target}\", available targets [{}]", .available.join(","))]
    UnknownTarget {
        target: String,
        available: Vec<String>,
    },

    /// Scheduling reached a fixpoint with incomplete tasks remaining.
    #[error("{0}")]
    UnresolvedTasks(UnresolvedReport),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BuildError {
    /// Name of the task this error is attributed to, if any.
    pub fn task(&self) -> Option<&str> {
        match self {
            BuildError::InvalidTask { key } => Some(key),
            BuildError::TaskExecutionFailure { task, .. } => Some(task),
            _ => None,
        }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, BuildError>;
