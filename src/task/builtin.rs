// src/task/builtin.rs

//! Small tasks shipped with the tool: `nop`, `clean` and `help`.

use std::sync::Arc;

use anyhow::Context;

use super::{BoxFuture, Task, TaskContext, TaskOutput};
use crate::fs::FileSystem;

/// Does nothing. Handy as an aggregation point for prerequisites.
#[derive(Debug, Clone, Copy, Default)]
pub struct NopTask;

impl Task for NopTask {}

/// Deletes the build directory. A missing directory is not an error.
#[derive(Debug, Clone)]
pub struct CleanTask {
    fs: Arc<dyn FileSystem>,
}

impl CleanTask {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }
}

impl Task for CleanTask {
    fn run(&self, ctx: TaskContext) -> BoxFuture<'_, TaskOutput> {
        Box::pin(async move {
            let build_dir = ctx.options.build_path();
            if self.fs.exists(&build_dir) {
                ctx.log.debug(format!("removing {}", build_dir.display()));
                self.fs
                    .remove_dir_all(&build_dir)
                    .with_context(|| format!("cleaning {}", build_dir.display()))?;
            }
            Ok(None)
        })
    }
}

/// Prints every known target with its help message.
#[derive(Debug, Clone)]
pub struct HelpTask {
    /// `(target name, help message)`, any order.
    listing: Vec<(String, String)>,
}

impl HelpTask {
    pub fn new(listing: Vec<(String, String)>) -> Self {
        Self { listing }
    }

    /// Targets sorted by name, each padded to the longest name plus one.
    pub fn render(&self) -> String {
        let width = self
            .listing
            .iter()
            .map(|(name, _)| name.len())
            .max()
            .unwrap_or(0);

        let mut rows: Vec<&(String, String)> = self.listing.iter().collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        let mut out = String::new();
        for (name, help) in rows {
            out.push_str(&format!("{:<pad$}{}\n", name, help, pad = width + 1));
        }
        out
    }
}

impl Task for HelpTask {
    fn run(&self, _ctx: TaskContext) -> BoxFuture<'_, TaskOutput> {
        Box::pin(async move {
            print!("{}", self.render());
            Ok(None)
        })
    }
}
