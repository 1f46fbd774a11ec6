use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tracing::debug;

use waypoint_core::config::AdaptiveSettings;
use waypoint_core::traits::Scorer;
use waypoint_core::types::{Catalog, CatalogItem, Difficulty, Query};
use waypoint_rank::rank_with;

use crate::ledger::PerformanceLedger;

/// Narrows a subject catalog to the next items worth asking.
///
/// Candidates are unmastered items at the target difficulty. When none are
/// left at that level the pool widens to every unmastered item, so a session
/// never stalls while questions remain. Shuffling is off unless a seed is
/// configured.
#[derive(Debug, Clone, Default)]
pub struct AdaptiveSelector {
    shuffle_seed: Option<u64>,
}

impl AdaptiveSelector {
    pub fn new() -> Self { Self::default() }

    pub fn from_settings(settings: &AdaptiveSettings) -> Self {
        let shuffle_seed = if settings.shuffle { Some(settings.seed.unwrap_or(0)) } else { None };
        Self { shuffle_seed }
    }

    pub fn with_shuffle_seed(mut self, seed: u64) -> Self {
        self.shuffle_seed = Some(seed);
        self
    }

    pub fn candidates<'a>(
        &self,
        catalog: &'a Catalog,
        ledger: &PerformanceLedger,
        target: Difficulty,
    ) -> Vec<&'a CatalogItem> {
        let remaining: Vec<&CatalogItem> =
            catalog.items().iter().filter(|item| !ledger.is_mastered(&item.id)).collect();
        let at_level: Vec<&CatalogItem> = remaining.iter().copied().filter(|item| item.difficulty == target).collect();
        let mut pool = if at_level.is_empty() {
            debug!(subject = catalog.subject(), %target, remaining = remaining.len(), "no items at target level, widening");
            remaining
        } else {
            at_level
        };
        if let Some(seed) = self.shuffle_seed {
            pool.shuffle(&mut StdRng::seed_from_u64(seed));
        }
        pool
    }

    pub fn select(
        &self,
        catalog: &Catalog,
        ledger: &PerformanceLedger,
        target: Difficulty,
        count: usize,
    ) -> Vec<CatalogItem> {
        self.candidates(catalog, ledger, target).into_iter().take(count).cloned().collect()
    }

    /// Like [`select`](Self::select), but candidates matching a topic query
    /// come first, best match first. Candidates that do not match fill any
    /// remaining slots in their usual order.
    pub fn select_for_topic<S>(
        &self,
        catalog: &Catalog,
        ledger: &PerformanceLedger,
        target: Difficulty,
        count: usize,
        scorer: &S,
        topic: &Query,
    ) -> Vec<CatalogItem>
    where
        S: Scorer<Query, CatalogItem> + ?Sized,
    {
        let pool: Vec<CatalogItem> = self.candidates(catalog, ledger, target).into_iter().cloned().collect();
        let mut picked: Vec<CatalogItem> =
            rank_with(scorer, topic, &pool, count).into_iter().map(|s| s.item).collect();
        for item in pool {
            if picked.len() >= count {
                break;
            }
            if !picked.iter().any(|p| p.id == item.id) {
                picked.push(item);
            }
        }
        picked
    }
}
