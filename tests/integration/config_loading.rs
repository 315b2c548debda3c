// tests/integration/config_loading.rs

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use tempfile::NamedTempFile;

use dynbuild::cli::CliArgs;
use dynbuild::config::{load_and_validate, load_or_default};
use dynbuild::engine::Orchestrator;
use dynbuild::errors::BuildError;
use dynbuild::fs::mock::MockFileSystem;
use dynbuild::project::ProjectOptions;
use dynbuild::types::ConcurrencyLimit;
use dynbuild_test_utils::{ConfigFileBuilder, TaskConfigBuilder};

use super::support::{TestResult, names};

use clap::Parser;

#[test]
fn loads_targets_and_project_section() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"
[project]
build_dir = "out"
source_dirs = ["src"]
default_target = "all"
concurrency = 3

[target.all]
help = "build the app"

[target.all.task.compile]
cmd = "cc -c main.c"
after = ["gen?"]

[target.all.task.gen]
cmd = "./gen.sh"
before = ["compile"]
"#
    )?;

    let cfg = load_and_validate(file.path())?;
    assert_eq!(cfg.project().build_dir, Path::new("out"));
    assert_eq!(cfg.project().concurrency, Some(3));

    let options = ProjectOptions::from_config(&cfg, ".");
    assert_eq!(options.target, "all");
    assert_eq!(options.concurrency.get(), Some(3));

    let target = &cfg.targets()["all"];
    assert_eq!(target.help, "build the app");
    assert_eq!(target.task["compile"].after, names(&["gen?"]));
    Ok(())
}

#[test]
fn invalid_task_is_a_config_error() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(
        file,
        r#"
[target.build.task.nothing]
after = ["x"]
"#
    )?;

    match load_and_validate(file.path()) {
        Err(BuildError::ConfigError(msg)) => {
            assert!(msg.contains("nothing"));
        }
        Err(e) => panic!("Expected ConfigError, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    Ok(())
}

#[test]
fn malformed_toml_is_a_toml_error() -> TestResult {
    let mut file = NamedTempFile::new()?;
    write!(file, "[target.build\ncmd = ")?;

    match load_and_validate(file.path()) {
        Err(BuildError::TomlError(_)) => {}
        Err(e) => panic!("Expected TomlError, got: {e:?}"),
        Ok(_) => panic!("Expected error, got Ok"),
    }
    Ok(())
}

#[test]
fn explicit_missing_path_is_an_io_error() {
    let result = load_or_default("does/not/exist/Dynbuild.toml");
    assert!(matches!(result, Err(BuildError::IoError(_))));
}

#[test]
fn cli_overrides_config_defaults() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .with_concurrency(4)
        .with_task("build", "a", TaskConfigBuilder::cmd("true").build())
        .build();
    let args = CliArgs::try_parse_from(["dynbuild", "-j", "1", "-v", "test", "fast"])?;

    let options = dynbuild::project_options(&cfg, Path::new("sub/Dynbuild.toml"), &args);

    assert_eq!(options.project_dir, Path::new("sub"));
    assert_eq!(options.target, "test");
    assert_eq!(options.target_args, names(&["fast"]));
    assert_eq!(options.concurrency, ConcurrencyLimit::from(1));
    assert!(options.verbose);
    Ok(())
}

#[test]
fn user_targets_override_builtins() -> TestResult {
    let cfg = ConfigFileBuilder::new()
        .with_target_help("clean", "custom clean")
        .with_task("clean", "wipe", TaskConfigBuilder::cmd("rm -rf out").build())
        .build();
    let orch = Orchestrator::from_config(&cfg, Arc::new(MockFileSystem::new()))?;

    let listing = orch.targets().listing();
    assert!(listing.contains(&("clean".to_string(), "custom clean".to_string())));

    let options = ProjectOptions::default().with_target("clean");
    let tasks = orch.resolve_tasks(&options)?;
    assert_eq!(tasks.names().collect::<Vec<_>>(), vec!["wipe"]);
    Ok(())
}
