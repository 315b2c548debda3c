// src/dag/diagnostics.rs

//! Deadlock reporting.
//!
//! When scheduling stops with tasks left over, [`check_complete`] builds an
//! [`UnresolvedReport`]: for every stuck task, the prerequisites it declared
//! that never completed. Injected (postrequisite) edges are left out of the
//! outstanding lists but are used to find cycles.

use std::collections::BTreeSet;
use std::fmt;

use petgraph::algo::tarjan_scc;
use petgraph::graphmap::DiGraphMap;

use crate::dag::completed::CompletedSet;
use crate::dag::graph::TaskGraph;
use crate::dag::prerequisite::{outstanding, Prerequisite};
use crate::types::TaskName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StuckTask {
    pub name: TaskName,
    /// Declared prerequisites that never completed, as written.
    pub outstanding: Vec<String>,
    /// Whether the task sits on a prerequisite cycle among stuck tasks.
    pub on_cycle: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedReport {
    /// Stuck tasks in registration order.
    pub stuck: Vec<StuckTask>,
    /// Prerequisite names that are not registered at all, sorted.
    pub missing: Vec<TaskName>,
}

impl UnresolvedReport {
    pub fn task(&self, name: &str) -> Option<&StuckTask> {
        self.stuck.iter().find(|t| t.name == name)
    }

    pub fn cyclic(&self) -> impl Iterator<Item = &str> {
        self.stuck.iter().filter(|t| t.on_cycle).map(|t| t.name.as_str())
    }
}

impl fmt::Display for UnresolvedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items: Vec<String> = self
            .stuck
            .iter()
            .map(|t| format!("{} ({})", t.name, t.outstanding.join(",")))
            .collect();
        write!(f, "Could not resolve all tasks [{}]", items.join(","))
    }
}

/// `Ok` if every registered task completed, else the deadlock report.
pub fn check_complete(
    graph: &TaskGraph,
    completed: &CompletedSet,
) -> Result<(), UnresolvedReport> {
    if completed.len() == graph.len() {
        return Ok(());
    }

    let options = graph.options();
    let is_done = |k: &str| completed.contains(k);

    let remaining: Vec<_> = graph.remaining(completed).collect();
    let effective: Vec<Vec<String>> = remaining
        .iter()
        .map(|entry| entry.effective_prerequisites(options))
        .collect();

    // Edge dep -> task between stuck tasks, declared and injected.
    let mut wait_for: DiGraphMap<&str, ()> = DiGraphMap::new();
    let mut missing = BTreeSet::new();

    for entry in &remaining {
        wait_for.add_node(entry.key());
    }
    for (entry, prereqs) in remaining.iter().zip(&effective) {
        for raw in prereqs {
            let name = Prerequisite::parse(raw).name();
            if is_done(name) {
                continue;
            }
            if graph.contains(name) {
                wait_for.add_edge(name, entry.key(), ());
            } else {
                missing.insert(name.to_string());
            }
        }
    }

    let mut cyclic: BTreeSet<&str> = BTreeSet::new();
    for component in tarjan_scc(&wait_for) {
        let self_loop = component.len() == 1 && wait_for.contains_edge(component[0], component[0]);
        if component.len() > 1 || self_loop {
            cyclic.extend(component);
        }
    }

    let stuck = remaining
        .iter()
        .map(|entry| {
            let declared = entry.declared_prerequisites(options);
            StuckTask {
                name: entry.key().to_string(),
                outstanding: outstanding(&declared, is_done)
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
                on_cycle: cyclic.contains(entry.key()),
            }
        })
        .collect();

    Err(UnresolvedReport {
        stuck,
        missing: missing.into_iter().collect(),
    })
}
