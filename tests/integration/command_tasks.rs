// tests/integration/command_tasks.rs

#![cfg(unix)]

use std::fs;
use std::sync::Arc;

use tempfile::tempdir;

use dynbuild::engine::Orchestrator;
use dynbuild::errors::BuildError;
use dynbuild::fs::RealFileSystem;
use dynbuild::project::ProjectOptions;
use dynbuild_test_utils::{ConfigFileBuilder, TaskConfigBuilder, init_tracing, with_timeout};

use super::support::TestResult;

#[tokio::test]
async fn commands_run_in_project_dir_in_order() -> TestResult {
    init_tracing();
    let dir = tempdir()?;

    let cfg = ConfigFileBuilder::new()
        .with_task("build", "first", TaskConfigBuilder::cmd("echo one >> log.txt").build())
        .with_task(
            "build",
            "second",
            TaskConfigBuilder::cmd("echo two >> log.txt").after("first").build(),
        )
        .build();
    let orch = Orchestrator::from_config(&cfg, Arc::new(RealFileSystem))?;
    let options = ProjectOptions::from_config(&cfg, dir.path());

    with_timeout(orch.run_target(options)).await?;

    assert_eq!(fs::read_to_string(dir.path().join("log.txt"))?, "one\ntwo\n");
    assert!(dir.path().join("build").is_dir());
    Ok(())
}

#[tokio::test]
async fn nonzero_exit_fails_the_task() -> TestResult {
    init_tracing();
    let dir = tempdir()?;

    let cfg = ConfigFileBuilder::new()
        .with_task("build", "broken", TaskConfigBuilder::cmd("exit 3").build())
        .build();
    let orch = Orchestrator::from_config(&cfg, Arc::new(RealFileSystem))?;
    let options = ProjectOptions::from_config(&cfg, dir.path());

    match with_timeout(orch.run_target(options)).await {
        Err(err @ BuildError::TaskExecutionFailure { .. }) => {
            assert_eq!(err.task(), Some("broken"));
            assert!(err.to_string().contains("exited with status 3"));
        }
        Err(e) => panic!("Expected TaskExecutionFailure, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    Ok(())
}
