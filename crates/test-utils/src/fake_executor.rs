use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use dynbuild::dag::BatchOutcome;
use dynbuild::exec::{ExecutorBackend, TaskThunk, TokioExecutor};

/// An executor that:
/// - records the keys of every batch it is handed, in order
/// - delegates the actual run to the production `TokioExecutor`.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    inner: TokioExecutor,
    batches: Arc<Mutex<Vec<Vec<String>>>>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the recorded batches; stays valid after the
    /// executor is moved into a runtime.
    pub fn batches(&self) -> Arc<Mutex<Vec<Vec<String>>>> {
        Arc::clone(&self.batches)
    }
}

impl ExecutorBackend for RecordingExecutor {
    fn run_batch(
        &mut self,
        batch: Vec<TaskThunk>,
    ) -> Pin<Box<dyn Future<Output = Vec<BatchOutcome>> + Send + '_>> {
        let keys = batch.iter().map(|t| t.key().to_string()).collect();
        self.batches.lock().unwrap().push(keys);
        self.inner.run_batch(batch)
    }
}
