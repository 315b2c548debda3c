// tests/integration/postrequisites.rs

use dynbuild::task::{Anchor, Ordered, TaskSet};
use dynbuild_test_utils::{Journal, JournalTask, init_tracing};

use super::support::{TestResult, names, recorded, run_tasks};

#[tokio::test]
async fn before_delays_the_named_task() -> TestResult {
    init_tracing();
    let journal = Journal::new();
    let tasks = TaskSet::new()
        .with("link", JournalTask::new(&journal))
        .with("compile", JournalTask::new(&journal).before(&["link"]));

    let (result, batches) = run_tasks(tasks, 0).await;
    result?;

    assert_eq!(recorded(&batches), vec![names(&["compile"]), names(&["link"])]);
    assert!(journal.finished_before_start("compile", "link"));
    Ok(())
}

#[tokio::test]
async fn before_on_unknown_task_is_ignored() -> TestResult {
    init_tracing();
    let journal = Journal::new();
    let tasks = TaskSet::new().with("a", JournalTask::new(&journal).before(&["ghost"]));

    let (result, _) = run_tasks(tasks, 0).await;
    let report = result?;
    assert_eq!(report.completed, names(&["a"]));
    Ok(())
}

#[tokio::test]
async fn anchor_orders_other_tasks_without_running() -> TestResult {
    init_tracing();
    let journal = Journal::new();
    let tasks = TaskSet::new()
        .with("gate", Ordered::new(Anchor).after(["setup"]).before(["deploy"]))
        .with("deploy", JournalTask::new(&journal))
        .with("setup", JournalTask::new(&journal));

    let (result, _) = run_tasks(tasks, 0).await;
    let report = result?;

    assert_eq!(report.round_of("setup"), Some(0));
    assert_eq!(report.round_of("gate"), Some(1));
    assert_eq!(report.round_of("deploy"), Some(2));
    assert_eq!(journal.started(), names(&["setup", "deploy"]));
    Ok(())
}

#[tokio::test]
async fn yielded_task_can_delay_an_existing_one() -> TestResult {
    init_tracing();
    let journal = Journal::new();
    let discovered = TaskSet::new()
        .with("compile:x.c", JournalTask::new(&journal).before(&["link"]));
    let tasks = TaskSet::new()
        .with("scan", JournalTask::new(&journal).yields(discovered))
        .with("link", JournalTask::new(&journal).after(&["scan"]));

    let (result, _) = run_tasks(tasks, 0).await;
    let report = result?;

    assert_eq!(report.round_of("compile:x.c"), Some(1));
    assert_eq!(report.round_of("link"), Some(2));
    Ok(())
}
