// src/dag/graph.rs

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::dag::completed::CompletedSet;
use crate::dag::prerequisite::Prerequisite;
use crate::errors::Result;
use crate::exec::TaskThunk;
use crate::project::ProjectOptions;
use crate::task::{Task, TaskSet};
use crate::types::TaskName;

/// One registered task: the task itself, its execution thunk and the
/// prerequisites other tasks injected through their postrequisites.
pub struct GraphEntry {
    key: TaskName,
    thunk: TaskThunk,
    task: Arc<dyn Task>,
    additional_prerequisites: Vec<TaskName>,
}

impl fmt::Debug for GraphEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphEntry")
            .field("key", &self.key)
            .field("additional_prerequisites", &self.additional_prerequisites)
            .finish_non_exhaustive()
    }
}

impl GraphEntry {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn thunk(&self) -> &TaskThunk {
        &self.thunk
    }

    pub fn additional_prerequisites(&self) -> &[TaskName] {
        &self.additional_prerequisites
    }

    /// Prerequisites the task itself declares (markers kept).
    pub fn declared_prerequisites(&self, options: &ProjectOptions) -> Vec<String> {
        self.task.prerequisites(options)
    }

    pub fn postrequisites(&self, options: &ProjectOptions) -> Vec<String> {
        self.task.postrequisites(options)
    }

    /// Declared plus injected prerequisites.
    pub fn effective_prerequisites(&self, options: &ProjectOptions) -> Vec<String> {
        let mut all = self.declared_prerequisites(options);
        all.extend(self.additional_prerequisites.iter().cloned());
        all
    }

    fn add_prerequisite(&mut self, source: &str) -> bool {
        if self.additional_prerequisites.iter().any(|k| k == source) {
            return false;
        }
        self.additional_prerequisites.push(source.to_string());
        true
    }
}

/// Arena of graph entries in registration order, indexed by name.
///
/// Entries are never removed; a slot keeps its index for the whole run.
#[derive(Debug)]
pub struct TaskGraph {
    entries: Vec<GraphEntry>,
    index: HashMap<TaskName, usize>,
    options: Arc<ProjectOptions>,
}

impl TaskGraph {
    pub fn new(options: Arc<ProjectOptions>) -> Self {
        Self {
            entries: Vec::new(),
            index: HashMap::new(),
            options,
        }
    }

    pub fn options(&self) -> &Arc<ProjectOptions> {
        &self.options
    }

    /// Wrap `task` into an entry keyed by `name`.
    ///
    /// Re-registering a name overwrites the task in place: the slot keeps
    /// its position and any injected prerequisites.
    pub fn register(&mut self, name: &str, task: Arc<dyn Task>) -> Result<()> {
        let thunk = TaskThunk::new(name, Arc::clone(&task), Arc::clone(&self.options))?;

        match self.index.get(name) {
            Some(&slot) => {
                debug!(task = %name, "task re-registered; replacing previous definition");
                let entry = &mut self.entries[slot];
                entry.thunk = thunk;
                entry.task = task;
            }
            None => {
                trace!(task = %name, "registering task");
                self.index.insert(name.to_string(), self.entries.len());
                self.entries.push(GraphEntry {
                    key: name.to_string(),
                    thunk,
                    task,
                    additional_prerequisites: Vec::new(),
                });
            }
        }
        Ok(())
    }

    /// Register every task of `tasks`, in order.
    pub fn merge(&mut self, tasks: TaskSet) -> Result<()> {
        for (name, task) in tasks {
            self.register(&name, task)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&GraphEntry> {
        self.index.get(name).map(|&slot| &self.entries[slot])
    }

    /// Entries in registration order.
    pub fn entries(&self) -> impl Iterator<Item = &GraphEntry> {
        self.entries.iter()
    }

    /// Entries not yet in `completed`, in registration order.
    pub fn remaining<'a>(
        &'a self,
        completed: &'a CompletedSet,
    ) -> impl Iterator<Item = &'a GraphEntry> + 'a {
        self.entries
            .iter()
            .filter(move |entry| !completed.contains(&entry.key))
    }

    /// Turn postrequisite declarations of incomplete tasks into extra
    /// prerequisites on their targets.
    ///
    /// Edges are only ever added. Sources that already completed are not
    /// evaluated, so a target registered after its source finished never
    /// receives that edge. Targets that do not exist yet are retried on the
    /// next call. Returns the number of edges added.
    pub fn refresh_postrequisite_edges(&mut self, completed: &CompletedSet) -> usize {
        let mut edges: Vec<(usize, TaskName)> = Vec::new();

        for entry in self.remaining(completed) {
            for target in entry.postrequisites(&self.options) {
                match self.index.get(&target) {
                    Some(&slot) => edges.push((slot, entry.key.clone())),
                    None => trace!(
                        source = %entry.key,
                        target = %target,
                        "postrequisite target not registered (yet)"
                    ),
                }
            }
        }

        let mut added = 0;
        for (slot, source) in edges {
            if self.entries[slot].add_prerequisite(&source) {
                debug!(
                    source = %source,
                    target = %self.entries[slot].key,
                    "postrequisite edge added"
                );
                added += 1;
            }
        }
        added
    }

    /// Indices of incomplete entries whose every prerequisite is complete,
    /// in registration order.
    pub fn ready(&self, completed: &CompletedSet) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| !completed.contains(&entry.key))
            .filter(|(_, entry)| {
                entry
                    .effective_prerequisites(&self.options)
                    .iter()
                    .all(|raw| Prerequisite::parse(raw).is_satisfied_by(|k| completed.contains(k)))
            })
            .map(|(slot, _)| slot)
            .collect()
    }

    pub fn entry_at(&self, slot: usize) -> &GraphEntry {
        &self.entries[slot]
    }

    /// Log a warning when a yielded task reuses the name of a finished one.
    pub(crate) fn warn_if_completed(&self, name: &str, completed: &CompletedSet) {
        if completed.contains(name) {
            warn!(
                task = %name,
                "task redefined after it already completed; the new definition will not run"
            );
        }
    }
}
