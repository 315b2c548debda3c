// src/engine/runtime.rs

use std::fmt;

use tracing::{debug, info};

use crate::dag::{BuildReport, Scheduler};
use crate::errors::Result;
use crate::exec::ExecutorBackend;

/// Drives the round scheduler, delegating batch execution to an
/// `ExecutorBackend`.
///
/// This is the async shell around `Scheduler`, which owns all scheduling
/// semantics. Rounds are strictly sequential: the next round is planned only
/// after the executor reports every task of the current one as settled.
pub struct Runtime<E: ExecutorBackend> {
    scheduler: Scheduler,
    executor: E,
}

impl<E: ExecutorBackend> fmt::Debug for Runtime<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("scheduler", &self.scheduler)
            .finish_non_exhaustive()
    }
}

impl<E: ExecutorBackend> Runtime<E> {
    pub fn new(scheduler: Scheduler, executor: E) -> Self {
        Self {
            scheduler,
            executor,
        }
    }

    /// Main loop.
    ///
    /// - Asks the scheduler for the next round.
    /// - Runs the batch on the executor and waits for all of it.
    /// - Commits the outcomes; the first failure ends the run.
    ///
    /// Stops at the first round with nothing ready, then reports.
    pub async fn run(mut self) -> Result<BuildReport> {
        info!(tasks = self.scheduler.graph().len(), "scheduling started");

        while let Some(plan) = self.scheduler.plan_round()? {
            let round = plan.index;
            debug!(round, names = ?plan.names(), "starting round");

            let outcomes = self.executor.run_batch(plan.batch).await;
            self.scheduler.commit_round(outcomes)?;

            debug!(
                round,
                completed = self.scheduler.completed().len(),
                "round finished"
            );
        }

        let report = self.scheduler.finish()?;
        info!(
            rounds = report.round_count(),
            completed = report.completed.len(),
            "all tasks completed"
        );
        Ok(report)
    }
}
