use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

use serde::Deserialize;

/// Canonical task name type used throughout the crate.
pub type TaskName = String;

/// How many tasks may be started together in one scheduling round.
///
/// - `Unbounded`: every ready task is started (default).
/// - `Limited(n)`: only the first `n` ready tasks, in graph insertion order.
///
/// Because rounds never overlap, the limit also bounds how many tasks run
/// at the same time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(from = "usize")]
pub enum ConcurrencyLimit {
    #[default]
    Unbounded,
    Limited(NonZeroUsize),
}

impl ConcurrencyLimit {
    /// `None` and `Some(0)` both mean "no limit".
    pub fn from_option(limit: Option<usize>) -> Self {
        limit.map(Self::from).unwrap_or_default()
    }

    pub fn get(&self) -> Option<usize> {
        match self {
            ConcurrencyLimit::Unbounded => None,
            ConcurrencyLimit::Limited(n) => Some(n.get()),
        }
    }

    /// Truncate a ready list to the configured limit.
    pub fn cap<T>(&self, mut ready: Vec<T>) -> Vec<T> {
        if let ConcurrencyLimit::Limited(n) = self {
            ready.truncate(n.get());
        }
        ready
    }
}

impl From<usize> for ConcurrencyLimit {
    fn from(n: usize) -> Self {
        match NonZeroUsize::new(n) {
            Some(n) => ConcurrencyLimit::Limited(n),
            None => ConcurrencyLimit::Unbounded,
        }
    }
}

impl FromStr for ConcurrencyLimit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "unbounded" | "unlimited" => Ok(ConcurrencyLimit::Unbounded),
            other => other
                .parse::<usize>()
                .map(ConcurrencyLimit::from)
                .map_err(|_| {
                    format!("invalid concurrency: {other} (expected a number or \"unbounded\")")
                }),
        }
    }
}

impl fmt::Display for ConcurrencyLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcurrencyLimit::Unbounded => f.write_str("unbounded"),
            ConcurrencyLimit::Limited(n) => write!(f, "{n}"),
        }
    }
}
