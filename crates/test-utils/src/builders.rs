#![allow(dead_code)]

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use dynbuild::config::{ConfigFile, DiscoverConfig, RawConfigFile, TargetConfig, TaskConfig};
use dynbuild::project::ProjectOptions;
use dynbuild::task::{BoxFuture, Capabilities, Task, TaskContext, TaskOutput, TaskSet};

/// Start/finish event recorded by a [`JournalTask`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Start(String),
    Finish(String),
}

#[derive(Debug, Default)]
struct JournalInner {
    events: Vec<Event>,
    in_flight: usize,
    peak_in_flight: usize,
}

/// Shared log of task starts and finishes across a whole run.
///
/// Cheap to clone; clones share the same log.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    inner: Arc<Mutex<JournalInner>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, JournalInner> {
        self.inner.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn start(&self, name: &str) {
        let mut inner = self.lock();
        inner.events.push(Event::Start(name.to_string()));
        inner.in_flight += 1;
        inner.peak_in_flight = inner.peak_in_flight.max(inner.in_flight);
    }

    fn finish(&self, name: &str) {
        let mut inner = self.lock();
        inner.events.push(Event::Finish(name.to_string()));
        inner.in_flight -= 1;
    }

    pub fn events(&self) -> Vec<Event> {
        self.lock().events.clone()
    }

    /// Names in the order they started.
    pub fn started(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Start(n) => Some(n),
                Event::Finish(_) => None,
            })
            .collect()
    }

    /// Names in the order they finished.
    pub fn finished(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Finish(n) => Some(n),
                Event::Start(_) => None,
            })
            .collect()
    }

    pub fn peak_in_flight(&self) -> usize {
        self.lock().peak_in_flight
    }

    /// `true` if `first` finished before `second` started.
    pub fn finished_before_start(&self, first: &str, second: &str) -> bool {
        let events = self.events();
        let finish = events
            .iter()
            .position(|e| *e == Event::Finish(first.to_string()));
        let start = events
            .iter()
            .position(|e| *e == Event::Start(second.to_string()));
        matches!((finish, start), (Some(f), Some(s)) if f < s)
    }

    pub fn ran(&self, name: &str) -> bool {
        self.started().iter().any(|n| n == name)
    }
}

/// Configurable test task that records itself in a [`Journal`].
#[derive(Debug, Clone)]
pub struct JournalTask {
    journal: Journal,
    after: Vec<String>,
    before: Vec<String>,
    delay: Duration,
    fail: Option<String>,
    yields: Option<TaskSet>,
    capabilities: Option<Capabilities>,
}

impl JournalTask {
    pub fn new(journal: &Journal) -> Self {
        Self {
            journal: journal.clone(),
            after: Vec::new(),
            before: Vec::new(),
            delay: Duration::ZERO,
            fail: None,
            yields: None,
            capabilities: None,
        }
    }

    pub fn after(mut self, keys: &[&str]) -> Self {
        self.after.extend(keys.iter().map(|k| k.to_string()));
        self
    }

    pub fn before(mut self, keys: &[&str]) -> Self {
        self.before.extend(keys.iter().map(|k| k.to_string()));
        self
    }

    /// Sleep this long inside `run`.
    pub fn delay_ms(mut self, ms: u64) -> Self {
        self.delay = Duration::from_millis(ms);
        self
    }

    /// Fail with `message` after the delay.
    pub fn fail(mut self, message: &str) -> Self {
        self.fail = Some(message.to_string());
        self
    }

    /// Yield `tasks` on success.
    pub fn yields(mut self, tasks: TaskSet) -> Self {
        self.yields = Some(tasks);
        self
    }

    /// Override the derived capabilities.
    pub fn capabilities(mut self, caps: Capabilities) -> Self {
        self.capabilities = Some(caps);
        self
    }
}

impl Task for JournalTask {
    fn capabilities(&self) -> Capabilities {
        if let Some(caps) = self.capabilities {
            return caps;
        }
        let mut caps = Capabilities::RUN;
        if !self.after.is_empty() {
            caps = caps.with_prerequisites();
        }
        if !self.before.is_empty() {
            caps = caps.with_postrequisites();
        }
        caps
    }

    fn prerequisites(&self, _options: &ProjectOptions) -> Vec<String> {
        self.after.clone()
    }

    fn postrequisites(&self, _options: &ProjectOptions) -> Vec<String> {
        self.before.clone()
    }

    fn run(&self, ctx: TaskContext) -> BoxFuture<'_, TaskOutput> {
        Box::pin(async move {
            let name = ctx.log.task().to_string();
            self.journal.start(&name);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            self.journal.finish(&name);

            if let Some(message) = &self.fail {
                anyhow::bail!("{message}");
            }
            Ok(self.yields.clone())
        })
    }
}

type BoxedFn = Box<dyn Fn(TaskContext) -> BoxFuture<'static, TaskOutput> + Send + Sync>;

/// Task whose body is a closure.
pub struct FnTask {
    body: BoxedFn,
    after: Vec<String>,
}

impl FnTask {
    pub fn new<F, Fut>(body: F) -> Self
    where
        F: Fn(TaskContext) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = TaskOutput> + Send + 'static,
    {
        Self {
            body: Box::new(move |ctx| -> BoxFuture<'static, TaskOutput> { Box::pin(body(ctx)) }),
            after: Vec::new(),
        }
    }

    pub fn after(mut self, keys: &[&str]) -> Self {
        self.after.extend(keys.iter().map(|k| k.to_string()));
        self
    }
}

impl Task for FnTask {
    fn capabilities(&self) -> Capabilities {
        if self.after.is_empty() {
            Capabilities::RUN
        } else {
            Capabilities::RUN.with_prerequisites()
        }
    }

    fn prerequisites(&self, _options: &ProjectOptions) -> Vec<String> {
        self.after.clone()
    }

    fn run(&self, ctx: TaskContext) -> BoxFuture<'_, TaskOutput> {
        (self.body)(ctx)
    }
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn with_task(mut self, target: &str, key: &str, task: TaskConfig) -> Self {
        self.config
            .target
            .entry(target.to_string())
            .or_default()
            .task
            .insert(key.to_string(), task);
        self
    }

    pub fn with_target_help(mut self, target: &str, help: &str) -> Self {
        self.config
            .target
            .entry(target.to_string())
            .or_insert_with(TargetConfig::default)
            .help = help.to_string();
        self
    }

    pub fn with_source_dir(mut self, dir: &str) -> Self {
        self.config.project.source_dirs.push(dir.into());
        self
    }

    pub fn with_build_dir(mut self, dir: &str) -> Self {
        self.config.project.build_dir = dir.into();
        self
    }

    pub fn with_concurrency(mut self, n: usize) -> Self {
        self.config.project.concurrency = Some(n);
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TaskConfig`.
pub struct TaskConfigBuilder {
    task: TaskConfig,
}

impl TaskConfigBuilder {
    pub fn cmd(cmd: &str) -> Self {
        Self {
            task: TaskConfig {
                cmd: Some(cmd.to_string()),
                ..TaskConfig::default()
            },
        }
    }

    pub fn discover(pattern: &str, cmd: &str) -> Self {
        Self {
            task: TaskConfig {
                discover: Some(DiscoverConfig {
                    pattern: pattern.to_string(),
                    cmd: cmd.to_string(),
                    ..DiscoverConfig::default()
                }),
                ..TaskConfig::default()
            },
        }
    }

    /// Neither command nor discovery; only orders other tasks.
    pub fn anchor() -> Self {
        Self {
            task: TaskConfig::default(),
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.task.after.push(dep.to_string());
        self
    }

    pub fn before(mut self, dep: &str) -> Self {
        self.task.before.push(dep.to_string());
        self
    }

    /// Postrequisite for every task a `discover` task yields.
    pub fn yields_before(mut self, dep: &str) -> Self {
        if let Some(discover) = self.task.discover.as_mut() {
            discover.before.push(dep.to_string());
        }
        self
    }

    pub fn build(self) -> TaskConfig {
        self.task
    }
}
