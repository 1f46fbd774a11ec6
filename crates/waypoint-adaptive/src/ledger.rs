use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use waypoint_core::types::{Catalog, ItemId};

/// Append-only record of answer outcomes per item.
///
/// Outcomes are kept in submission order. An item becomes *mastered* the
/// first time it is answered correctly and stays mastered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformanceLedger {
    outcomes: BTreeMap<ItemId, Vec<bool>>,
    mastered: BTreeSet<ItemId>,
}

impl PerformanceLedger {
    pub fn new() -> Self { Self::default() }

    /// Build a ledger by replaying `(id, outcomes)` pairs in order.
    pub fn from_outcomes<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<bool>)>,
        S: Into<String>,
    {
        let mut ledger = Self::new();
        for (id, outcomes) in entries {
            let id = id.into();
            for correct in outcomes {
                ledger.record(id.clone(), correct);
            }
        }
        ledger
    }

    pub fn record(&mut self, id: impl Into<String>, correct: bool) {
        let id = id.into();
        if correct {
            self.mastered.insert(id.clone());
        }
        self.outcomes.entry(id).or_default().push(correct);
    }

    pub fn outcomes(&self, id: &str) -> &[bool] {
        self.outcomes.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_mastered(&self, id: &str) -> bool { self.mastered.contains(id) }

    pub fn mastered(&self) -> &BTreeSet<ItemId> { &self.mastered }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &[bool])> {
        self.outcomes.iter().map(|(id, o)| (id, o.as_slice()))
    }

    pub fn is_empty(&self) -> bool { self.outcomes.is_empty() }

    pub fn attempts(&self) -> usize { self.outcomes.values().map(Vec::len).sum() }

    pub fn correct(&self) -> usize {
        self.outcomes.values().map(|o| o.iter().filter(|&&c| c).count()).sum()
    }

    /// Correct over total attempts; zero when nothing has been answered.
    pub fn accuracy(&self) -> f64 {
        match self.attempts() {
            0 => 0.0,
            n => self.correct() as f64 / n as f64,
        }
    }

    /// True once every item in `catalog` has been answered correctly at
    /// least once. An empty catalog has nothing left to ask and is complete.
    pub fn is_complete(&self, catalog: &Catalog) -> bool {
        catalog.items().iter().all(|item| self.is_mastered(&item.id))
    }

    /// Mastered items that belong to `catalog`.
    pub fn mastered_in(&self, catalog: &Catalog) -> usize {
        catalog.items().iter().filter(|item| self.is_mastered(&item.id)).count()
    }
}
