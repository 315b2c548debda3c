// tests/integration/orchestrator.rs

use std::sync::Arc;

use dynbuild::engine::Orchestrator;
use dynbuild::errors::BuildError;
use dynbuild::fs::FileSystem;
use dynbuild::fs::mock::MockFileSystem;
use dynbuild::project::ProjectOptions;
use dynbuild::target::{StaticTarget, TargetRegistry};
use dynbuild::task::TaskSet;
use dynbuild_test_utils::{FnTask, Journal, JournalTask, RecordingExecutor, init_tracing, with_timeout};

use super::support::{TestResult, names, recorded};

fn registry(journal: &Journal) -> TargetRegistry {
    TargetRegistry::new()
        .with(
            "_all",
            StaticTarget::new("", TaskSet::new().with("setup", JournalTask::new(journal))),
        )
        .with(
            "build",
            StaticTarget::new(
                "compile everything",
                TaskSet::new()
                    .with("compile", JournalTask::new(journal).after(&["setup"]))
                    .with("link", JournalTask::new(journal).after(&["compile"])),
            ),
        )
}

#[tokio::test]
async fn runs_all_tasks_with_the_selected_target() -> TestResult {
    init_tracing();
    let journal = Journal::new();
    let orch = Orchestrator::new(registry(&journal), Arc::new(MockFileSystem::new()));

    let executor = RecordingExecutor::new();
    let batches = executor.batches();
    let report = with_timeout(orch.run_target_with(ProjectOptions::default(), executor)).await?;

    assert_eq!(
        recorded(&batches),
        vec![names(&["setup"]), names(&["compile"]), names(&["link"])]
    );
    assert_eq!(report.completed, names(&["setup", "compile", "link"]));
    Ok(())
}

#[tokio::test]
async fn unknown_target_fails_before_running_anything() -> TestResult {
    init_tracing();
    let journal = Journal::new();
    let fs = MockFileSystem::new();
    let orch = Orchestrator::new(registry(&journal), Arc::new(fs.clone()));

    let options = ProjectOptions::default().with_target("deploy");
    let result = orch.run_target(options).await;

    match result {
        Err(BuildError::UnknownTarget { target, available }) => {
            assert_eq!(target, "deploy");
            assert_eq!(available, names(&["_all", "build", "clean", "help"]));
        }
        Err(e) => panic!("Expected UnknownTarget, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    assert!(journal.started().is_empty());
    assert!(!fs.exists(&ProjectOptions::default().build_path()));
    Ok(())
}

#[tokio::test]
async fn clean_removes_the_build_directory() -> TestResult {
    init_tracing();
    let fs = MockFileSystem::new();
    fs.add_file("./build/main.o", b"obj".to_vec());
    let orch = Orchestrator::new(TargetRegistry::new(), Arc::new(fs.clone()));

    let options = ProjectOptions::default().with_target("clean");
    let report = with_timeout(orch.run_target(options.clone())).await?;

    assert_eq!(report.completed, names(&["clean"]));
    assert!(!fs.exists(&options.build_path()));
    Ok(())
}

#[tokio::test]
async fn help_lists_every_target() -> TestResult {
    init_tracing();
    let journal = Journal::new();
    let orch = Orchestrator::new(registry(&journal), Arc::new(MockFileSystem::new()));

    let listing = orch.targets().listing();
    let help: Vec<_> = listing.iter().map(|(name, _)| name.as_str()).collect();
    assert_eq!(help, vec!["_all", "build", "clean", "help"]);

    let options = ProjectOptions::default().with_target("help");
    let report = with_timeout(orch.run_target(options)).await?;
    assert_eq!(report.completed, names(&["setup", "help"]));
    Ok(())
}

#[tokio::test]
async fn tasks_see_target_args() -> TestResult {
    init_tracing();
    let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let task = FnTask::new(move |ctx| {
        let sink = Arc::clone(&sink);
        async move {
            sink.lock().unwrap().extend(ctx.options.target_args.iter().cloned());
            Ok(None)
        }
    });
    let targets = TargetRegistry::new().with("test", StaticTarget::new("", TaskSet::new().with("run", task)));
    let orch = Orchestrator::new(targets, Arc::new(MockFileSystem::new()));

    let mut options = ProjectOptions::default().with_target("test");
    options.target_args = names(&["--filter", "unit"]);
    with_timeout(orch.run_target(options)).await?;

    assert_eq!(*seen.lock().unwrap(), names(&["--filter", "unit"]));
    Ok(())
}
