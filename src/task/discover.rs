// src/task/discover.rs

//! Source discovery: a task that globs the project's sources and yields one
//! command task per matching file.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use globset::{Glob, GlobMatcher};

use super::{BoxFuture, CommandTask, Ordered, Task, TaskContext, TaskOutput, TaskSet};
use crate::fs::FileSystem;
use crate::project::ProjectOptions;

/// Yields `<prefix><relative path>` tasks running `cmd` for each source file
/// matching `pattern`.
///
/// Files come from a recursive walk of `source_dirs` plus the explicit
/// `source_files`; patterns match against paths relative to the project
/// directory, using `/` as separator.
///
/// `cmd` may use `{file}`, `{stem}`, `{name}` and `{build_dir}`.
#[derive(Debug, Clone)]
pub struct DiscoverTask {
    pattern: String,
    matcher: GlobMatcher,
    cmd: String,
    prefix: String,
    after: Vec<String>,
    before: Vec<String>,
    fs: Arc<dyn FileSystem>,
}

impl DiscoverTask {
    pub fn new(
        pattern: &str,
        cmd: impl Into<String>,
        prefix: impl Into<String>,
        fs: Arc<dyn FileSystem>,
    ) -> Result<Self> {
        let matcher = Glob::new(pattern)
            .with_context(|| format!("invalid glob pattern: {pattern}"))?
            .compile_matcher();
        Ok(Self {
            pattern: pattern.to_string(),
            matcher,
            cmd: cmd.into(),
            prefix: prefix.into(),
            after: Vec::new(),
            before: Vec::new(),
            fs,
        })
    }

    /// Prerequisites given to every yielded task.
    pub fn yielded_after(mut self, keys: Vec<String>) -> Self {
        self.after = keys;
        self
    }

    /// Postrequisites given to every yielded task.
    pub fn yielded_before(mut self, keys: Vec<String>) -> Self {
        self.before = keys;
        self
    }

    /// Matching files as project-relative `/`-separated strings, sorted.
    pub fn collect_sources(&self, options: &ProjectOptions) -> Result<Vec<String>> {
        let root = &options.project_dir;
        let mut found = BTreeSet::new();

        for dir in &options.source_dirs {
            let dir = options.resolve(dir);
            if !self.fs.is_dir(&dir) {
                continue;
            }
            for path in walk_files(self.fs.as_ref(), &dir)? {
                if let Some(rel) = relative_str(root, &path) {
                    if self.matcher.is_match(&rel) {
                        found.insert(rel);
                    }
                }
            }
        }

        for file in &options.source_files {
            let path = options.resolve(file);
            if !self.fs.is_file(&path) {
                continue;
            }
            if let Some(rel) = relative_str(root, &path) {
                if self.matcher.is_match(&rel) {
                    found.insert(rel);
                }
            }
        }

        Ok(found.into_iter().collect())
    }

    fn task_for(&self, rel: &str, options: &ProjectOptions) -> Ordered<CommandTask> {
        let cmd = render_template(&self.cmd, rel, options);
        Ordered::new(CommandTask::new(cmd))
            .after(self.after.iter().cloned())
            .before(self.before.iter().cloned())
    }
}

impl Task for DiscoverTask {
    fn run(&self, ctx: TaskContext) -> BoxFuture<'_, TaskOutput> {
        Box::pin(async move {
            let sources = self.collect_sources(&ctx.options)?;
            ctx.log.debug(format!(
                "pattern {} matched {} file(s)",
                self.pattern,
                sources.len()
            ));

            let mut yielded = TaskSet::new();
            for rel in &sources {
                yielded.insert(format!("{}{}", self.prefix, rel), self.task_for(rel, &ctx.options));
            }
            Ok(Some(yielded))
        })
    }
}

/// Collect all files below `root`.
fn walk_files(fs: &dyn FileSystem, root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut stack = vec![root.to_path_buf()];

    while let Some(dir) = stack.pop() {
        for path in fs.read_dir(&dir)? {
            if fs.is_dir(&path) {
                stack.push(path);
            } else if fs.is_file(&path) {
                files.push(path);
            }
        }
    }

    Ok(files)
}

fn relative_str(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(rel.to_string_lossy().replace('\\', "/"))
}

/// Expand `{file}`, `{stem}`, `{name}` and `{build_dir}` in a command.
pub fn render_template(template: &str, rel: &str, options: &ProjectOptions) -> String {
    let path = Path::new(rel);
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = path
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let build_dir = options.build_dir.to_string_lossy().replace('\\', "/");

    template
        .replace("{file}", rel)
        .replace("{stem}", &stem)
        .replace("{name}", &name)
        .replace("{build_dir}", &build_dir)
}
