// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile, TaskConfig};
use crate::errors::{BuildError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::BuildError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.project, raw.target))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_project(cfg)?;
    for (target, target_cfg) in cfg.target.iter() {
        validate_target_name(target)?;
        for (key, task) in target_cfg.task.iter() {
            validate_task(target, key, task)?;
        }
    }
    Ok(())
}

fn validate_project(cfg: &RawConfigFile) -> Result<()> {
    if cfg.project.concurrency == Some(0) {
        return Err(BuildError::ConfigError(
            "[project].concurrency must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.project.default_target.is_empty() {
        return Err(BuildError::ConfigError(
            "[project].default_target must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn validate_target_name(name: &str) -> Result<()> {
    if name.is_empty() || name.starts_with('-') {
        return Err(BuildError::ConfigError(format!(
            "invalid target name '{name}'"
        )));
    }
    Ok(())
}

fn validate_task(target: &str, key: &str, task: &TaskConfig) -> Result<()> {
    let ctx = format!("target '{target}' task '{key}'");

    match (&task.cmd, &task.discover) {
        (Some(_), Some(_)) => {
            return Err(BuildError::ConfigError(format!(
                "{ctx} sets both `cmd` and `discover`"
            )));
        }
        (None, None) if task.before.is_empty() => {
            return Err(BuildError::ConfigError(format!(
                "{ctx} needs `cmd`, `discover` or `before`"
            )));
        }
        _ => {}
    }

    if let Some(cmd) = &task.cmd {
        if cmd.trim().is_empty() {
            return Err(BuildError::ConfigError(format!("{ctx} has an empty `cmd`")));
        }
    }

    if let Some(discover) = &task.discover {
        Glob::new(&discover.pattern).map_err(|e| {
            BuildError::ConfigError(format!(
                "{ctx} has invalid discover pattern '{}': {e}",
                discover.pattern
            ))
        })?;
        if discover.cmd.trim().is_empty() {
            return Err(BuildError::ConfigError(format!(
                "{ctx} has an empty discover `cmd`"
            )));
        }
    }

    Ok(())
}
