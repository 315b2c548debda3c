// tests/integration/failures.rs

use dynbuild::errors::BuildError;
use dynbuild::task::TaskSet;
use dynbuild_test_utils::{Journal, JournalTask, init_tracing};

use super::support::{TestResult, run_tasks};

#[tokio::test]
async fn failure_names_the_task_and_cause() -> TestResult {
    init_tracing();
    let journal = Journal::new();
    let tasks = TaskSet::new().with("compile", JournalTask::new(&journal).fail("syntax error"));

    let (result, _) = run_tasks(tasks, 0).await;

    match result {
        Err(err @ BuildError::TaskExecutionFailure { .. }) => {
            assert_eq!(err.task(), Some("compile"));
            assert_eq!(err.to_string(), "Task \"compile\" failed: syntax error");
        }
        Err(e) => panic!("Expected TaskExecutionFailure, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    Ok(())
}

#[tokio::test]
async fn siblings_finish_and_later_rounds_never_start() -> TestResult {
    init_tracing();
    let journal = Journal::new();
    let tasks = TaskSet::new()
        .with("bad", JournalTask::new(&journal).fail("boom"))
        .with("slow", JournalTask::new(&journal).delay_ms(100))
        .with("after_slow", JournalTask::new(&journal).after(&["slow"]));

    let (result, batches) = run_tasks(tasks, 0).await;

    assert!(matches!(result, Err(BuildError::TaskExecutionFailure { .. })));
    assert_eq!(journal.finished(), vec!["bad".to_string(), "slow".to_string()]);
    assert!(!journal.ran("after_slow"));
    assert_eq!(batches.lock().unwrap().len(), 1);
    Ok(())
}

#[tokio::test]
async fn first_failure_in_batch_order_wins() -> TestResult {
    init_tracing();
    let journal = Journal::new();
    let tasks = TaskSet::new()
        .with("one", JournalTask::new(&journal).delay_ms(80).fail("first"))
        .with("two", JournalTask::new(&journal).fail("second"));

    let (result, _) = run_tasks(tasks, 0).await;

    match result {
        Err(err) => assert_eq!(err.task(), Some("one")),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    Ok(())
}
