use std::collections::{BTreeMap, HashMap};

use dashmap::DashMap;

use crate::numeric::Decimal;

/// One contribution to a score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScoreEntry {
    Value(Decimal),
    Cap(Decimal),
}

/// Contributions to one score, grouped by the source that made them.
///
/// The visible value is the sum of all `Value` entries, limited by the
/// smallest `Cap` entry if there is one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score {
    by_source: HashMap<String, Vec<ScoreEntry>>,
}

impl Score {
    pub fn add(&mut self, source: &str, value: Decimal) {
        self.push(source, ScoreEntry::Value(value));
    }

    pub fn cap(&mut self, source: &str, limit: Decimal) {
        self.push(source, ScoreEntry::Cap(limit));
    }

    fn push(&mut self, source: &str, entry: ScoreEntry) {
        self.by_source
            .entry(source.to_string())
            .or_default()
            .push(entry);
    }

    pub fn total(&self) -> Decimal {
        let entries = self.by_source.values().flatten();
        let sum: Decimal = entries
            .clone()
            .filter_map(|entry| match entry {
                ScoreEntry::Value(v) => Some(v.clone()),
                ScoreEntry::Cap(_) => None,
            })
            .sum();
        let cap = entries
            .filter_map(|entry| match entry {
                ScoreEntry::Cap(c) => Some(c),
                ScoreEntry::Value(_) => None,
            })
            .min();
        match cap {
            Some(cap) if *cap < sum => cap.clone(),
            _ => sum,
        }
    }

    /// Removes every entry made by `source`; returns whether there were any.
    pub fn revert(&mut self, source: &str) -> bool {
        self.by_source.remove(source).is_some()
    }

    pub fn entries(&self, source: &str) -> &[ScoreEntry] {
        self.by_source.get(source).map(Vec::as_slice).unwrap_or_default()
    }
}

#[derive(Debug, Default)]
pub struct ScoreStore {
    scores: DashMap<String, Score>,
}

impl ScoreStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, name: &str, source: &str, value: Decimal) -> Decimal {
        let mut score = self.scores.entry(name.to_string()).or_default();
        score.add(source, value);
        score.total()
    }

    pub fn cap(&self, name: &str, source: &str, limit: Decimal) -> Decimal {
        let mut score = self.scores.entry(name.to_string()).or_default();
        score.cap(source, limit);
        score.total()
    }

    /// Visible value; zero for a score nobody contributed to.
    pub fn value(&self, name: &str) -> Decimal {
        self.scores
            .get(name)
            .map(|score| score.total())
            .unwrap_or_default()
    }

    pub fn revert_source(&self, source: &str) -> usize {
        self.scores
            .iter_mut()
            .filter_map(|mut entry| entry.value_mut().revert(source).then_some(()))
            .count()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.scores.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn clear(&self) {
        self.scores.clear();
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.scores
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().total().to_string()))
            .collect()
    }
}
