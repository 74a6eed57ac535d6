use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicU64, Ordering},
};

use dashmap::DashMap;
use serde::Serialize;

use crate::ast::Atom;

/// A stored value stamped with its write order.
#[derive(Debug, Clone, PartialEq)]
struct Written {
    seq: u64,
    value: Atom,
}

/// One named variable: a value per source plus the latest unsourced write.
#[derive(Debug, Clone, Default, PartialEq)]
struct Variable {
    by_source: BTreeMap<String, Written>,
    shared: Option<Written>,
}

impl Variable {
    /// The most recent surviving write, whatever its source.
    fn last(&self) -> Option<&Atom> {
        self.by_source
            .values()
            .chain(self.shared.as_ref())
            .max_by_key(|written| written.seq)
            .map(|written| &written.value)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariableSnapshot {
    /// Most recent write, whatever its source.
    pub value: Option<String>,
    pub sources: BTreeMap<String, Option<String>>,
}

/// Script variables of one execution context.
///
/// Reads with a source key prefer that source's value and fall back to the
/// most recent write; a read without a key sees only the most recent write.
/// Reverting a source also withdraws it from the fallback.
#[derive(Debug, Default)]
pub struct VariableStore {
    variables: DashMap<String, Variable>,
    seq: AtomicU64,
}

impl VariableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `value` under `source`, or as an unsourced write.
    pub fn set(&self, name: &str, source: Option<&str>, value: Atom) {
        let written = Written {
            seq: self.seq.fetch_add(1, Ordering::Relaxed),
            value,
        };
        let mut variable = self.variables.entry(name.to_string()).or_default();
        match source {
            Some(source) => {
                variable.by_source.insert(source.to_string(), written);
            }
            None => variable.shared = Some(written),
        }
    }

    pub fn get(&self, name: &str, source: Option<&str>) -> Option<Atom> {
        let variable = self.variables.get(name)?;
        source
            .and_then(|source| variable.by_source.get(source))
            .map(|written| &written.value)
            .or_else(|| variable.last())
            .cloned()
    }

    /// Value written by `source` itself, without fallback.
    pub fn get_own(&self, name: &str, source: &str) -> Option<Atom> {
        self.variables
            .get(name)?
            .by_source
            .get(source)
            .map(|written| written.value.clone())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn remove(&self, name: &str) -> bool {
        self.variables.remove(name).is_some()
    }

    /// Drops every per-source value written by `source`, except for variables
    /// whose name starts with `keep_prefix`. Unsourced writes are untouched.
    pub fn revert_source(&self, source: &str, keep_prefix: &str) -> usize {
        let mut reverted = 0;
        for mut entry in self.variables.iter_mut() {
            if !keep_prefix.is_empty() && entry.key().starts_with(keep_prefix) {
                continue;
            }
            if entry.value_mut().by_source.remove(source).is_some() {
                reverted += 1;
            }
        }
        reverted
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.variables.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn clear(&self) {
        self.variables.clear();
    }

    pub fn snapshot(&self) -> BTreeMap<String, VariableSnapshot> {
        self.variables
            .iter()
            .map(|entry| {
                let variable = entry.value();
                (
                    entry.key().clone(),
                    VariableSnapshot {
                        value: variable.last().and_then(Atom::text),
                        sources: variable
                            .by_source
                            .iter()
                            .map(|(source, written)| (source.clone(), written.value.text()))
                            .collect(),
                    },
                )
            })
            .collect()
    }
}
