use std::collections::HashMap;
use tracing::debug;

use waypoint_core::config::{RankSettings, ScoringSettings};
use waypoint_core::types::{Catalog, CatalogItem, ItemId, Query, ScoredItem};

use crate::ranker::rank;
use crate::scorer::{KnowledgeScorer, ScoreBreakdown};

/// Ranked hits plus the per-item score breakdowns, keyed by item id.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub hits: Vec<ScoredItem<CatalogItem>>,
    pub details: HashMap<ItemId, ScoreBreakdown>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool { self.hits.is_empty() }

    pub fn len(&self) -> usize { self.hits.len() }

    pub fn ids(&self) -> Vec<&str> { self.hits.iter().map(|h| h.item.id.as_str()).collect() }
}

/// Knowledge-base lookup for the chat assistant.
pub struct KnowledgeBase {
    catalog: Catalog,
    scorer: KnowledgeScorer,
    default_limit: usize,
}

impl KnowledgeBase {
    pub fn new(catalog: Catalog, scoring: ScoringSettings, rank_settings: &RankSettings) -> Self {
        Self { catalog, scorer: KnowledgeScorer::new(scoring), default_limit: rank_settings.default_limit }
    }

    pub fn catalog(&self) -> &Catalog { &self.catalog }

    pub fn scorer(&self) -> &KnowledgeScorer { &self.scorer }

    pub fn search(&self, query: &Query) -> SearchResults {
        self.search_with_limit(query, self.default_limit)
    }

    pub fn search_with_limit(&self, query: &Query, limit: usize) -> SearchResults {
        let items = self.catalog.items();
        let breakdowns: Vec<ScoreBreakdown> = items.iter().map(|item| self.scorer.breakdown(query, item)).collect();
        let scores: Vec<f64> = breakdowns.iter().map(ScoreBreakdown::total).collect();
        let hits = rank(items, &scores, limit);
        let mut details = HashMap::with_capacity(hits.len());
        for (item, breakdown) in items.iter().zip(breakdowns) {
            if hits.iter().any(|h| h.item.id == item.id) {
                details.insert(item.id.clone(), breakdown);
            }
        }
        debug!(query = %query.text, category = ?query.category, hits = hits.len(), "knowledge search");
        SearchResults { hits, details }
    }

    /// The single best entry, or `None` when nothing scores above zero.
    pub fn best_match(&self, query: &Query) -> Option<ScoredItem<CatalogItem>> {
        self.search_with_limit(query, 1).hits.into_iter().next()
    }

    /// Entries sharing keywords with `id`, most shared first. Unknown ids
    /// have no related entries.
    pub fn related(&self, id: &str, limit: usize) -> Vec<ScoredItem<CatalogItem>> {
        let Some(anchor) = self.catalog.get(id) else { return Vec::new() };
        let items = self.catalog.items();
        let scores: Vec<f64> = items
            .iter()
            .map(|item| {
                if item.id == anchor.id {
                    0.0
                } else {
                    item.keywords.iter().filter(|k| anchor.keywords.contains(*k)).count() as f64
                }
            })
            .collect();
        rank(items, &scores, limit)
    }
}
