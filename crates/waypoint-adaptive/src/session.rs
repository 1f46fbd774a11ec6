use std::sync::Arc;
use tracing::{debug, info};

use waypoint_core::config::AdaptiveSettings;
use waypoint_core::error::{Error, Result};
use waypoint_core::types::{Catalog, CatalogItem, Difficulty};

use crate::ledger::PerformanceLedger;
use crate::selector::AdaptiveSelector;
use crate::state::{AdaptiveState, Transition};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub mastered: usize,
    pub total: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.total == 0 { 0.0 } else { self.mastered as f64 / self.total as f64 }
    }
}

/// One learner working through one subject: the ledger, the adaptive state
/// and the selector that turns them into the next questions.
#[derive(Debug, Clone)]
pub struct StudySession {
    catalog: Arc<Catalog>,
    ledger: PerformanceLedger,
    state: AdaptiveState,
    selector: AdaptiveSelector,
}

impl StudySession {
    pub fn new(catalog: Arc<Catalog>, start: Difficulty, settings: &AdaptiveSettings) -> Self {
        Self::resume(catalog, PerformanceLedger::new(), start, settings)
    }

    /// Continue from an existing ledger.
    pub fn resume(catalog: Arc<Catalog>, ledger: PerformanceLedger, start: Difficulty, settings: &AdaptiveSettings) -> Self {
        Self {
            catalog,
            ledger,
            state: AdaptiveState::from_settings(start, settings),
            selector: AdaptiveSelector::from_settings(settings),
        }
    }

    pub fn subject(&self) -> &str { self.catalog.subject() }

    pub fn ledger(&self) -> &PerformanceLedger { &self.ledger }

    pub fn state(&self) -> &AdaptiveState { &self.state }

    pub fn into_ledger(self) -> PerformanceLedger { self.ledger }

    /// Record one answer. Unknown item ids are rejected and leave the session
    /// untouched.
    pub fn submit(&mut self, item_id: &str, correct: bool) -> Result<Transition> {
        if !self.catalog.contains(item_id) {
            return Err(Error::NotFound(format!("item '{}' in subject '{}'", item_id, self.subject())));
        }
        let was_complete = self.is_complete();
        self.ledger.record(item_id, correct);
        let transition = self.state.record(correct);
        debug!(subject = self.subject(), item = item_id, correct, ?transition, level = %self.state.current(), "answer recorded");
        if !was_complete && self.is_complete() {
            info!(subject = self.subject(), attempts = self.ledger.attempts(), "subject complete");
        }
        Ok(transition)
    }

    pub fn next_items(&self, count: usize) -> Vec<CatalogItem> {
        self.selector.select(&self.catalog, &self.ledger, self.state.current(), count)
    }

    pub fn is_complete(&self) -> bool { self.ledger.is_complete(&self.catalog) }

    pub fn progress(&self) -> Progress {
        Progress { mastered: self.ledger.mastered_in(&self.catalog), total: self.catalog.len() }
    }
}
