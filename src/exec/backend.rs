// src/exec/backend.rs

//! Pluggable executor backend abstraction.
//!
//! The runtime hands every planned batch to an `ExecutorBackend` and waits
//! for the outcomes. This keeps the production executor in one place while
//! tests can wrap or replace it (e.g. to record batches).
//!
//! - `TokioExecutor` is the default implementation. It spawns one Tokio
//!   task per thunk, so batch members run in parallel on the runtime's
//!   worker threads.

use std::future::Future;
use std::pin::Pin;

use tracing::debug;

use crate::dag::BatchOutcome;
use crate::errors::BuildError;

use super::thunk::TaskThunk;

/// Trait abstracting how a batch of ready tasks is executed.
pub trait ExecutorBackend: Send {
    /// Run every thunk of `batch` concurrently and wait until all of them
    /// settled.
    ///
    /// Must return exactly one outcome per thunk, in batch order. A failing
    /// thunk must not cancel its siblings.
    fn run_batch(
        &mut self,
        batch: Vec<TaskThunk>,
    ) -> Pin<Box<dyn Future<Output = Vec<BatchOutcome>> + Send + '_>>;
}

/// Production executor: one `tokio::spawn` per task.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioExecutor;

impl TokioExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl ExecutorBackend for TokioExecutor {
    fn run_batch(
        &mut self,
        batch: Vec<TaskThunk>,
    ) -> Pin<Box<dyn Future<Output = Vec<BatchOutcome>> + Send + '_>> {
        Box::pin(async move {
            let handles: Vec<_> = batch
                .into_iter()
                .map(|thunk| {
                    let key = thunk.key().to_string();
                    (key, tokio::spawn(thunk.invoke()))
                })
                .collect();

            // Await in batch order; every handle is awaited, so the whole
            // batch has settled when this returns.
            let mut outcomes = Vec::with_capacity(handles.len());
            for (key, handle) in handles {
                let result = match handle.await {
                    Ok(result) => result,
                    Err(join_err) => {
                        debug!(task = %key, error = %join_err, "task panicked or was aborted");
                        Err(BuildError::TaskExecutionFailure {
                            task: key.clone(),
                            source: anyhow::Error::new(join_err),
                        })
                    }
                };
                outcomes.push(BatchOutcome { key, result });
            }
            outcomes
        })
    }
}
