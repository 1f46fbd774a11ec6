//! Additive multi-factor relevance scorer for knowledge entries and questions.
//!
//! Factors: whole-query/title match, keyword match, per-token title and
//! content matches, curated pattern boosts. A category filter gates the whole
//! score to zero. Scores are not normalized.

use serde::Serialize;

use waypoint_core::config::{PatternBoost, ScoringSettings};
use waypoint_core::traits::Scorer;
use waypoint_core::types::{CatalogItem, Query};

use crate::tokenize::{significant_tokens, tokens};

/// Per-factor contributions for one (query, item) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub title: f64,
    pub keywords: f64,
    pub tokens: f64,
    pub patterns: f64,
    pub matched_keywords: Vec<String>,
}

impl ScoreBreakdown {
    pub fn total(&self) -> f64 {
        self.title + self.keywords + self.tokens + self.patterns
    }
}

#[derive(Debug, Clone)]
pub struct KnowledgeScorer {
    weights: ScoringSettings,
    boosts: Vec<PatternBoost>,
}

impl KnowledgeScorer {
    pub fn new(weights: ScoringSettings) -> Self {
        let boosts = weights
            .pattern_boosts
            .iter()
            .map(|b| PatternBoost {
                triggers: b.triggers.iter().map(|t| t.to_lowercase()).collect(),
                targets: b.targets.iter().map(|t| t.to_lowercase()).collect(),
                bonus: b.bonus,
            })
            .collect();
        Self { weights, boosts }
    }

    pub fn breakdown(&self, query: &Query, item: &CatalogItem) -> ScoreBreakdown {
        let mut out = ScoreBreakdown::default();
        if let Some(category) = query.category.as_deref().filter(|c| !c.is_empty()) {
            if !item.category.eq_ignore_ascii_case(category) {
                return out;
            }
        }
        let q = query.text.trim().to_lowercase();
        if q.is_empty() {
            return out;
        }
        let title = item.title.to_lowercase();
        let content = item.content.to_lowercase();
        let all_tokens = tokens(&q);
        let min_len = self.weights.min_token_len;

        if !title.is_empty() && (title.contains(&q) || q.contains(&title)) {
            out.title = self.weights.title_match;
        }

        let mut keywords: Vec<String> = Vec::with_capacity(item.keywords.len());
        for keyword in &item.keywords {
            let keyword = keyword.trim().to_lowercase();
            if !keyword.is_empty() && !keywords.contains(&keyword) {
                keywords.push(keyword);
            }
        }

        for keyword in &keywords {
            if q.contains(keyword.as_str()) {
                out.keywords += self.weights.keyword_in_query;
                out.matched_keywords.push(keyword.clone());
            } else if all_tokens.iter().any(|t| {
                t == keyword || (t.chars().count() >= min_len && keyword.contains(t.as_str()))
            }) {
                out.keywords += self.weights.keyword_partial;
                out.matched_keywords.push(keyword.clone());
            }
        }

        for token in significant_tokens(&q, min_len) {
            if content.contains(&token) {
                out.tokens += self.weights.token_in_content;
            }
            if title.contains(&token) {
                out.tokens += self.weights.token_in_title;
            }
        }

        for boost in &self.boosts {
            let triggered = boost.triggers.iter().any(|t| q.contains(t.as_str()));
            if triggered && keywords.iter().any(|k| boost.targets.contains(k)) {
                out.patterns += boost.bonus;
            }
        }
        out
    }
}

impl Default for KnowledgeScorer {
    fn default() -> Self { Self::new(ScoringSettings::default()) }
}

impl Scorer<Query, CatalogItem> for KnowledgeScorer {
    fn score(&self, query: &Query, item: &CatalogItem) -> f64 {
        self.breakdown(query, item).total().max(0.0)
    }
}
