// src/dag/scheduler.rs

use std::collections::VecDeque;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::dag::completed::CompletedSet;
use crate::dag::diagnostics::check_complete;
use crate::dag::graph::TaskGraph;
use crate::dag::scheduler_step::{BatchOutcome, BuildReport, RoundPlan};
use crate::errors::{BuildError, Result};
use crate::project::ProjectOptions;
use crate::task::{Task, TaskSet};
use crate::types::{ConcurrencyLimit, TaskName};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Rounds are still being planned and committed.
    Scheduling,
    /// No further rounds: either nothing was ready or a round failed.
    Done,
}

/// Round-based scheduler core.
///
/// Owns the task graph and the completed set for one run. It is purely
/// synchronous: the caller asks for a [`RoundPlan`], runs the batch however
/// it likes, and hands the outcomes back to [`Scheduler::commit_round`].
///
/// Per round:
/// 1. merge tasks yielded by the previous round,
/// 2. refresh postrequisite edges,
/// 3. collect ready tasks in registration order,
/// 4. cap the batch by the concurrency limit.
///
/// An empty batch ends scheduling; [`Scheduler::finish`] then reports
/// whatever never ran.
#[derive(Debug)]
pub struct Scheduler {
    graph: TaskGraph,
    completed: CompletedSet,
    limit: ConcurrencyLimit,
    rounds: Vec<Vec<TaskName>>,
    /// Tasks yielded by the last committed round, merged when the next
    /// round is planned.
    pending_merges: VecDeque<TaskSet>,
    /// Round handed out by `plan_round` and not committed yet.
    in_flight: Option<usize>,
    state: SchedulerState,
}

impl Scheduler {
    pub fn new(options: Arc<ProjectOptions>) -> Self {
        let limit = options.concurrency;
        Self {
            graph: TaskGraph::new(options),
            completed: CompletedSet::new(),
            limit,
            rounds: Vec::new(),
            pending_merges: VecDeque::new(),
            in_flight: None,
            state: SchedulerState::Scheduling,
        }
    }

    /// Scheduler with every task of `tasks` registered.
    pub fn from_tasks(options: Arc<ProjectOptions>, tasks: TaskSet) -> Result<Self> {
        let mut scheduler = Self::new(options);
        scheduler.graph.merge(tasks)?;
        Ok(scheduler)
    }

    pub fn register(&mut self, name: &str, task: Arc<dyn Task>) -> Result<()> {
        self.graph.register(name, task)
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    pub fn completed(&self) -> &CompletedSet {
        &self.completed
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == SchedulerState::Done
    }

    /// Rounds planned so far.
    pub fn round_count(&self) -> usize {
        self.rounds.len()
    }

    /// Plan the next round.
    ///
    /// Returns `Ok(None)` once no task is ready (or scheduling already
    /// stopped). Fails if a yielded task is invalid.
    pub fn plan_round(&mut self) -> Result<Option<RoundPlan>> {
        if self.is_done() {
            return Ok(None);
        }
        if let Some(round) = self.in_flight {
            return Err(BuildError::Other(anyhow::anyhow!(
                "round {round} was planned but never committed"
            )));
        }

        if let Err(err) = self.apply_pending_merges() {
            self.state = SchedulerState::Done;
            return Err(err);
        }

        self.graph.refresh_postrequisite_edges(&self.completed);

        let remaining: Vec<&str> = self
            .graph
            .remaining(&self.completed)
            .map(|entry| entry.key())
            .collect();
        debug!(?remaining, "remaining tasks");

        let ready = self.graph.ready(&self.completed);
        let ready_count = ready.len();
        let slots = self.limit.cap(ready);

        if slots.is_empty() {
            info!(
                rounds = self.rounds.len(),
                completed = self.completed.len(),
                registered = self.graph.len(),
                "no ready tasks; scheduling finished"
            );
            self.state = SchedulerState::Done;
            return Ok(None);
        }

        let index = self.rounds.len();
        let batch: Vec<_> = slots
            .into_iter()
            .map(|slot| self.graph.entry_at(slot).thunk().clone())
            .collect();
        let plan = RoundPlan { index, batch };
        let names: Vec<TaskName> = plan.names().into_iter().map(str::to_string).collect();

        debug!(
            round = index,
            ready = ready_count,
            started = names.len(),
            limit = %self.limit,
            ?names,
            "round planned"
        );

        self.rounds.push(names);
        self.in_flight = Some(index);
        Ok(Some(plan))
    }

    /// Record how the planned round settled.
    ///
    /// Every task that succeeded is marked complete and its yielded tasks
    /// are queued for merging. If any task failed, scheduling stops and the
    /// first failure in batch order is returned.
    pub fn commit_round(&mut self, outcomes: Vec<BatchOutcome>) -> Result<()> {
        let round = self.in_flight.take().ok_or_else(|| {
            BuildError::Other(anyhow::anyhow!("commit_round called without a planned round"))
        })?;

        let mut first_error = None;
        for outcome in outcomes {
            match outcome.result {
                Ok(yielded) => {
                    self.completed.insert(outcome.key, round);
                    if let Some(tasks) = yielded.filter(|t| !t.is_empty()) {
                        debug!(round, new_tasks = ?tasks, "queueing yielded tasks");
                        self.pending_merges.push_back(tasks);
                    }
                }
                Err(err) => {
                    warn!(round, task = %outcome.key, error = %err, "task failed");
                    if first_error.is_none() {
                        first_error = Some(err);
                    }
                }
            }
        }

        if let Some(err) = first_error {
            self.state = SchedulerState::Done;
            return Err(err);
        }
        Ok(())
    }

    fn apply_pending_merges(&mut self) -> Result<()> {
        while let Some(tasks) = self.pending_merges.pop_front() {
            for name in tasks.names() {
                self.graph.warn_if_completed(name, &self.completed);
            }
            self.graph.merge(tasks)?;
        }
        Ok(())
    }

    /// Consume the scheduler once no more rounds are planned.
    pub fn finish(self) -> Result<BuildReport> {
        if let Err(report) = check_complete(&self.graph, &self.completed) {
            error!(
                stuck = report.stuck.len(),
                missing = ?report.missing,
                cyclic = ?report.cyclic().collect::<Vec<_>>(),
                "scheduling stopped with unresolved tasks"
            );
            return Err(BuildError::UnresolvedTasks(report));
        }

        Ok(BuildReport {
            rounds: self.rounds,
            completed: self.completed.into_order(),
        })
    }
}
