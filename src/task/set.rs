// src/task/set.rs

use std::fmt;
use std::sync::Arc;

use super::Task;
use crate::types::TaskName;

/// Ordered mapping from task name to task.
///
/// Order is insertion order and is later used as the tie-break when the
/// scheduler picks a batch. Re-inserting an existing name replaces the task
/// but keeps its original position.
#[derive(Clone, Default)]
pub struct TaskSet {
    entries: Vec<(TaskName, Arc<dyn Task>)>,
}

impl TaskSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, name: impl Into<TaskName>, task: impl Task) -> Self {
        self.insert(name, task);
        self
    }

    pub fn insert(&mut self, name: impl Into<TaskName>, task: impl Task) {
        self.insert_arc(name, Arc::new(task));
    }

    pub fn insert_arc(&mut self, name: impl Into<TaskName>, task: Arc<dyn Task>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = task,
            None => self.entries.push((name, task)),
        }
    }

    /// Merge `other` into `self`; tasks in `other` win on name collisions.
    pub fn extend(&mut self, other: TaskSet) {
        for (name, task) in other.entries {
            self.insert_arc(name, task);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Task>> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, t)| t)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<dyn Task>)> {
        self.entries.iter().map(|(k, t)| (k.as_str(), t))
    }
}

impl IntoIterator for TaskSet {
    type Item = (TaskName, Arc<dyn Task>);
    type IntoIter = std::vec::IntoIter<(TaskName, Arc<dyn Task>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(TaskName, Arc<dyn Task>)> for TaskSet {
    fn from_iter<I: IntoIterator<Item = (TaskName, Arc<dyn Task>)>>(iter: I) -> Self {
        let mut set = TaskSet::new();
        for (name, task) in iter {
            set.insert_arc(name, task);
        }
        set
    }
}

impl fmt::Debug for TaskSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
