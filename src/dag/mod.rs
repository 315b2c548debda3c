// src/dag/mod.rs

//! Task graph and round scheduling.
//!
//! - [`graph`] holds the arena of registered tasks and their injected edges.
//! - [`scheduler`] contains the per-run state machine that plans rounds,
//!   commits their outcomes and merges yielded tasks.
//! - [`completed`] is the append-only set of finished tasks.
//! - [`prerequisite`] parses prerequisite keys (optionality marker).
//! - [`scheduler_step`] defines the round plan / outcome / report types.
//! - [`diagnostics`] builds the report for tasks that never ran.

pub mod completed;
pub mod diagnostics;
pub mod graph;
pub mod prerequisite;
pub mod scheduler;
pub mod scheduler_step;

pub use completed::CompletedSet;
pub use diagnostics::{StuckTask, UnresolvedReport};
pub use graph::{GraphEntry, TaskGraph};
pub use scheduler::{Scheduler, SchedulerState};
pub use scheduler_step::{BatchOutcome, BuildReport, RoundPlan};
