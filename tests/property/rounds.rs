// tests/property/rounds.rs

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use proptest::prelude::*;

use dynbuild::dag::{BatchOutcome, BuildReport, Scheduler};
use dynbuild::project::ProjectOptions;
use dynbuild::task::{NopTask, Ordered, TaskSet};
use dynbuild::types::ConcurrencyLimit;

/// Prerequisite lists for `task_0..task_n`, where task `i` may only depend
/// on tasks with a lower index, so the graph is acyclic.
fn dag_strategy(max_tasks: usize) -> impl Strategy<Value = Vec<Vec<usize>>> {
    (1..=max_tasks).prop_flat_map(|num_tasks| {
        proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..4),
            num_tasks,
        )
        .prop_map(|raw| {
            raw.into_iter()
                .enumerate()
                .map(|(i, deps)| {
                    let deps: BTreeSet<usize> = if i == 0 {
                        BTreeSet::new()
                    } else {
                        deps.into_iter().map(|d| d % i).collect()
                    };
                    deps.into_iter().collect()
                })
                .collect()
        })
    })
}

fn name(i: usize) -> String {
    format!("task_{i}")
}

/// Register in reverse index order so insertion order differs from a
/// topological one.
fn task_set(deps: &[Vec<usize>]) -> TaskSet {
    let mut tasks = TaskSet::new();
    for (i, prereqs) in deps.iter().enumerate().rev() {
        tasks.insert(name(i), Ordered::new(NopTask).after(prereqs.iter().map(|&d| name(d))));
    }
    tasks
}

fn drive(deps: &[Vec<usize>], limit: usize) -> BuildReport {
    let options =
        Arc::new(ProjectOptions::default().with_concurrency(ConcurrencyLimit::from(limit)));
    let mut scheduler = Scheduler::from_tasks(options, task_set(deps)).unwrap();
    while let Some(plan) = scheduler.plan_round().unwrap() {
        let outcomes = plan
            .batch
            .iter()
            .map(|t| BatchOutcome {
                key: t.key().to_string(),
                result: Ok(None),
            })
            .collect();
        scheduler.commit_round(outcomes).unwrap();
    }
    scheduler.finish().unwrap()
}

/// Length of the longest prerequisite chain ending at each task.
fn depths(deps: &[Vec<usize>]) -> Vec<usize> {
    let mut depth = vec![0; deps.len()];
    for i in 0..deps.len() {
        depth[i] = deps[i].iter().map(|&d| depth[d] + 1).max().unwrap_or(0);
    }
    depth
}

proptest! {
    #[test]
    fn every_task_runs_after_its_prerequisites(
        deps in dag_strategy(12),
        limit in 0..4usize,
    ) {
        let report = drive(&deps, limit);
        prop_assert_eq!(report.completed.len(), deps.len());

        let round_of: HashMap<String, usize> = (0..deps.len())
            .map(|i| (name(i), report.round_of(&name(i)).unwrap()))
            .collect();
        for (i, prereqs) in deps.iter().enumerate() {
            for &d in prereqs {
                prop_assert!(round_of[&name(d)] < round_of[&name(i)]);
            }
        }
    }

    #[test]
    fn rounds_never_exceed_the_limit(
        deps in dag_strategy(12),
        limit in 1..4usize,
    ) {
        let report = drive(&deps, limit);
        for round in &report.rounds {
            prop_assert!(!round.is_empty());
            prop_assert!(round.len() <= limit);
        }
    }

    #[test]
    fn unbounded_rounds_follow_the_longest_chain(deps in dag_strategy(12)) {
        let report = drive(&deps, 0);
        let depth = depths(&deps);

        let expected = depth.iter().max().map_or(0, |d| d + 1);
        prop_assert_eq!(report.round_count(), expected);
        for (i, d) in depth.iter().enumerate() {
            prop_assert_eq!(report.round_of(&name(i)), Some(*d));
        }
    }

    #[test]
    fn runs_are_deterministic(deps in dag_strategy(10), limit in 0..3usize) {
        prop_assert_eq!(drive(&deps, limit), drive(&deps, limit));
    }
}
