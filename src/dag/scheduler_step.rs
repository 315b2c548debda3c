// src/dag/scheduler_step.rs

//! Round-level types exchanged between the scheduler core and the runtime.

use crate::errors::Result;
use crate::exec::TaskThunk;
use crate::task::TaskSet;
use crate::types::TaskName;

/// A batch of ready tasks the scheduler wants started together.
#[derive(Debug, Clone)]
pub struct RoundPlan {
    /// Zero-based round index.
    pub index: usize,
    pub batch: Vec<TaskThunk>,
}

impl RoundPlan {
    pub fn names(&self) -> Vec<&str> {
        self.batch.iter().map(|t| t.key()).collect()
    }

    pub fn len(&self) -> usize {
        self.batch.len()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }
}

/// How one task of a batch settled.
#[derive(Debug)]
pub struct BatchOutcome {
    pub key: TaskName,
    pub result: Result<Option<TaskSet>>,
}

/// Summary of a successful scheduling run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Task keys started in each round, in batch order.
    pub rounds: Vec<Vec<TaskName>>,
    /// Task keys in completion order.
    pub completed: Vec<TaskName>,
}

impl BuildReport {
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// Round in which `task` was started (and completed).
    pub fn round_of(&self, task: &str) -> Option<usize> {
        self.rounds
            .iter()
            .position(|round| round.iter().any(|t| t == task))
    }
}
