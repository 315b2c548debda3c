// src/dag/completed.rs

use std::collections::HashMap;

use crate::types::TaskName;

/// Append-only set of tasks that finished successfully in this run,
/// remembering completion order and the round each one completed in.
#[derive(Debug, Clone, Default)]
pub struct CompletedSet {
    order: Vec<TaskName>,
    rounds: HashMap<TaskName, usize>,
}

impl CompletedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `name` as completed in `round`. Returns `false` if it was
    /// already present (the original round is kept).
    pub fn insert(&mut self, name: TaskName, round: usize) -> bool {
        if self.rounds.contains_key(&name) {
            return false;
        }
        self.rounds.insert(name.clone(), round);
        self.order.push(name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rounds.contains_key(name)
    }

    pub fn round_of(&self, name: &str) -> Option<usize> {
        self.rounds.get(name).copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Names in completion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(|s| s.as_str())
    }

    pub fn into_order(self) -> Vec<TaskName> {
        self.order
    }
}
