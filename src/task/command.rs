// src/task/command.rs

//! Shell command task.

use std::process::Stdio;

use anyhow::{bail, Context};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;

use super::{BoxFuture, Task, TaskContext, TaskOutput};

/// Runs a shell command in the project directory.
///
/// stdout lines are logged at `info`, stderr lines at `error`, both through
/// the task's logger. A non-zero exit status fails the task.
#[derive(Debug, Clone)]
pub struct CommandTask {
    cmd: String,
}

impl CommandTask {
    pub fn new(cmd: impl Into<String>) -> Self {
        Self { cmd: cmd.into() }
    }

    pub fn cmd(&self) -> &str {
        &self.cmd
    }
}

impl Task for CommandTask {
    fn run(&self, ctx: TaskContext) -> BoxFuture<'_, TaskOutput> {
        Box::pin(async move {
            run_shell(&self.cmd, &ctx).await?;
            Ok(None)
        })
    }
}

/// Build a shell command appropriate for the platform.
fn shell_command(cmd: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(cmd);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(cmd);
        c
    }
}

pub async fn run_shell(cmd: &str, ctx: &TaskContext) -> anyhow::Result<()> {
    ctx.log.debug(format!("$ {cmd}"));

    let mut command = shell_command(cmd);
    command
        .current_dir(&ctx.options.project_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command
        .spawn()
        .with_context(|| format!("spawning `{cmd}`"))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // Drain both pipes concurrently so neither buffer fills up.
    let out_log = ctx.log.clone();
    let out_reader = tokio::spawn(async move {
        if let Some(stdout) = stdout {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                out_log.info(line);
            }
        }
    });

    let err_log = ctx.log.clone();
    let err_reader = tokio::spawn(async move {
        if let Some(stderr) = stderr {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                err_log.error(line);
            }
        }
    });

    let status = child
        .wait()
        .await
        .with_context(|| format!("waiting for `{cmd}`"))?;

    // Readers finish once the pipes close.
    let _ = out_reader.await;
    let _ = err_reader.await;

    if !status.success() {
        match status.code() {
            Some(code) => bail!("command `{cmd}` exited with status {code}"),
            None => bail!("command `{cmd}` was terminated by a signal"),
        }
    }

    Ok(())
}
