// tests/integration/unresolved.rs

use dynbuild::errors::BuildError;
use dynbuild::task::TaskSet;
use dynbuild_test_utils::{Journal, JournalTask, init_tracing};

use super::support::{TestResult, run_tasks};

#[tokio::test]
async fn missing_prerequisite_is_reported() -> TestResult {
    init_tracing();
    let journal = Journal::new();
    let tasks = TaskSet::new()
        .with("a", JournalTask::new(&journal))
        .with("b", JournalTask::new(&journal).after(&["a", "ghost"]));

    let (result, _) = run_tasks(tasks, 0).await;

    match result {
        Err(BuildError::UnresolvedTasks(report)) => {
            assert_eq!(report.to_string(), "Could not resolve all tasks [b (ghost)]");
            assert_eq!(report.missing, vec!["ghost".to_string()]);
        }
        Err(e) => panic!("Expected UnresolvedTasks, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    assert!(journal.ran("a"));
    Ok(())
}

#[tokio::test]
async fn cycle_is_reported_after_independent_work() -> TestResult {
    init_tracing();
    let journal = Journal::new();
    let tasks = TaskSet::new()
        .with("free", JournalTask::new(&journal))
        .with("x", JournalTask::new(&journal).after(&["y"]))
        .with("y", JournalTask::new(&journal).after(&["x?"]));

    let (result, _) = run_tasks(tasks, 0).await;

    match result {
        Err(BuildError::UnresolvedTasks(report)) => {
            assert_eq!(report.to_string(), "Could not resolve all tasks [x (y),y (x?)]");
            assert_eq!(report.cyclic().collect::<Vec<_>>(), vec!["x", "y"]);
        }
        Err(e) => panic!("Expected UnresolvedTasks, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    assert_eq!(journal.started(), vec!["free".to_string()]);
    Ok(())
}

#[tokio::test]
async fn mutual_postrequisites_deadlock() -> TestResult {
    init_tracing();
    let journal = Journal::new();
    let tasks = TaskSet::new()
        .with("p", JournalTask::new(&journal).before(&["q"]))
        .with("q", JournalTask::new(&journal).before(&["p"]));

    let (result, _) = run_tasks(tasks, 0).await;

    // Injected edges are not declared prerequisites, so nothing is listed.
    match result {
        Err(BuildError::UnresolvedTasks(report)) => {
            assert_eq!(report.to_string(), "Could not resolve all tasks [p (),q ()]");
        }
        Err(e) => panic!("Expected UnresolvedTasks, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    assert!(journal.started().is_empty());
    Ok(())
}
