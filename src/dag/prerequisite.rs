// src/dag/prerequisite.rs

//! Prerequisite keys and the optionality marker.
//!
//! A key may end in `?`, which reads as "optional". The readiness check
//! strips the marker and still requires the named task to complete, so an
//! optional key whose task never exists blocks just like a mandatory one.
//! [`Prerequisite::is_optional`] exposes the flag for callers that want to
//! inspect it; the scheduler itself does not treat it differently.

use std::collections::HashSet;

pub const OPTIONAL_MARKER: char = '?';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Prerequisite<'a> {
    raw: &'a str,
}

impl<'a> Prerequisite<'a> {
    pub fn parse(raw: &'a str) -> Self {
        Self { raw }
    }

    /// Key as written, marker included.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Key with a single trailing marker removed.
    pub fn name(&self) -> &'a str {
        self.raw.strip_suffix(OPTIONAL_MARKER).unwrap_or(self.raw)
    }

    pub fn is_optional(&self) -> bool {
        self.raw.ends_with(OPTIONAL_MARKER)
    }

    /// Whether `completed` satisfies this prerequisite.
    pub fn is_satisfied_by(&self, completed: impl Fn(&str) -> bool) -> bool {
        completed(self.name())
    }
}

/// Declared keys that are still outstanding, as written, in declaration
/// order and without duplicates.
pub fn outstanding<'a>(
    declared: &'a [String],
    is_completed: impl Fn(&str) -> bool,
) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    declared
        .iter()
        .map(|raw| Prerequisite::parse(raw))
        .filter(|p| !p.is_satisfied_by(&is_completed))
        .filter(|p| seen.insert(p.raw()))
        .map(|p| p.raw())
        .collect()
}
