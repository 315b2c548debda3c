// tests/integration/support.rs

use std::error::Error;
use std::sync::{Arc, Mutex};

use dynbuild::dag::{BuildReport, Scheduler};
use dynbuild::engine::Runtime;
use dynbuild::errors::Result;
use dynbuild::project::ProjectOptions;
use dynbuild::task::TaskSet;
use dynbuild::types::ConcurrencyLimit;
use dynbuild_test_utils::{RecordingExecutor, with_timeout};

pub type TestResult = std::result::Result<(), Box<dyn Error>>;

pub type Batches = Arc<Mutex<Vec<Vec<String>>>>;

pub fn options(limit: usize) -> Arc<ProjectOptions> {
    Arc::new(ProjectOptions::default().with_concurrency(ConcurrencyLimit::from(limit)))
}

/// Run `tasks` to completion on a recording executor.
pub async fn run_tasks(tasks: TaskSet, limit: usize) -> (Result<BuildReport>, Batches) {
    let executor = RecordingExecutor::new();
    let batches = executor.batches();

    let result = match Scheduler::from_tasks(options(limit), tasks) {
        Ok(scheduler) => with_timeout(Runtime::new(scheduler, executor).run()).await,
        Err(err) => Err(err),
    };
    (result, batches)
}

pub fn recorded(batches: &Batches) -> Vec<Vec<String>> {
    batches.lock().unwrap().clone()
}

pub fn names(keys: &[&str]) -> Vec<String> {
    keys.iter().map(|k| k.to_string()).collect()
}
