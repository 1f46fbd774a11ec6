//! Aggregate accuracy statistics and templated study recommendations.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

use waypoint_core::config::InsightSettings;
use waypoint_core::types::{Catalog, Difficulty};

use crate::ledger::PerformanceLedger;

pub const EMPTY_LEDGER_ADVICE: &str = "Answer a few questions to unlock personalized insights.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    pub correct: usize,
    pub total: usize,
}

impl BucketStats {
    fn add(&mut self, outcomes: &[bool]) {
        self.total += outcomes.len();
        self.correct += outcomes.iter().filter(|&&c| c).count();
    }

    pub fn accuracy(&self) -> f64 {
        if self.total == 0 { 0.0 } else { self.correct as f64 / self.total as f64 }
    }
}

/// Overall-accuracy band that selects the headline recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PerformanceBand {
    Excellent,
    Good,
    Fair,
    NeedsWork,
}

impl PerformanceBand {
    pub fn from_accuracy(accuracy: f64) -> Self {
        if accuracy >= 0.9 {
            PerformanceBand::Excellent
        } else if accuracy >= 0.7 {
            PerformanceBand::Good
        } else if accuracy >= 0.5 {
            PerformanceBand::Fair
        } else {
            PerformanceBand::NeedsWork
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PerformanceBand::Excellent => {
                "Strong performance! You have mastered most of this material; move on to harder questions."
            }
            PerformanceBand::Good => "Good progress. Revisit the questions you missed to lock in the concepts.",
            PerformanceBand::Fair => "You are getting there. Review the explanations before retrying missed questions.",
            PerformanceBand::NeedsWork => "Focus on the fundamentals first and restart from beginner-level questions.",
        }
    }
}

/// A level or topic that stands out in either direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Area {
    Level(Difficulty),
    Topic(String),
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Area::Level(d) => write!(f, "{d} questions"),
            Area::Topic(t) => f.write_str(t),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightReport {
    pub subject: String,
    pub overall: BucketStats,
    pub band: Option<PerformanceBand>,
    pub accuracy_by_difficulty: BTreeMap<Difficulty, BucketStats>,
    pub accuracy_by_category: BTreeMap<String, BucketStats>,
    pub strong_areas: Vec<Area>,
    pub weak_areas: Vec<Area>,
    pub recommendations: Vec<String>,
}

impl InsightReport {
    pub fn overall_accuracy(&self) -> f64 { self.overall.accuracy() }
}

#[derive(Debug, Clone, Default)]
pub struct InsightGenerator {
    settings: InsightSettings,
}

impl InsightGenerator {
    pub fn new(settings: InsightSettings) -> Self { Self { settings } }

    /// Summarize `ledger` against `catalog`. Ledger entries for ids the
    /// catalog does not know are ignored.
    pub fn report(&self, catalog: &Catalog, ledger: &PerformanceLedger) -> InsightReport {
        let mut overall = BucketStats::default();
        let mut by_difficulty: BTreeMap<Difficulty, BucketStats> = BTreeMap::new();
        let mut by_category: BTreeMap<String, BucketStats> = BTreeMap::new();
        for (id, outcomes) in ledger.iter() {
            let Some(item) = catalog.get(id) else {
                debug!(subject = catalog.subject(), id = %id, "ledger entry outside catalog skipped");
                continue;
            };
            if outcomes.is_empty() {
                continue;
            }
            overall.add(outcomes);
            by_difficulty.entry(item.difficulty).or_default().add(outcomes);
            if !item.category.is_empty() {
                by_category.entry(item.category.clone()).or_default().add(outcomes);
            }
        }

        let buckets = by_difficulty
            .iter()
            .map(|(d, s)| (Area::Level(*d), *s))
            .chain(by_category.iter().map(|(c, s)| (Area::Topic(c.clone()), *s)));
        let mut strong_areas = Vec::new();
        let mut weak_areas = Vec::new();
        let mut weak_lines = Vec::new();
        for (area, stats) in buckets {
            let accuracy = stats.accuracy();
            if accuracy >= self.settings.strong_threshold {
                strong_areas.push(area);
            } else if accuracy < self.settings.weak_threshold {
                weak_lines.push(format!(
                    "Review {}: {:.0}% correct is below the {:.0}% target.",
                    area,
                    accuracy * 100.0,
                    self.settings.weak_threshold * 100.0
                ));
                weak_areas.push(area);
            }
        }

        let band = (overall.total > 0).then(|| PerformanceBand::from_accuracy(overall.accuracy()));
        let mut recommendations = Vec::new();
        match band {
            None => recommendations.push(EMPTY_LEDGER_ADVICE.to_string()),
            Some(band) => {
                recommendations.push(band.message().to_string());
                recommendations.extend(weak_lines);
                if let Some(tips) = self.settings.subject_tips.get(catalog.subject()) {
                    recommendations.extend(tips.iter().cloned());
                }
            }
        }

        debug!(subject = catalog.subject(), attempts = overall.total, ?band, weak = weak_areas.len(), "insight report built");
        InsightReport {
            subject: catalog.subject().to_string(),
            overall,
            band,
            accuracy_by_difficulty: by_difficulty,
            accuracy_by_category: by_category,
            strong_areas,
            weak_areas,
            recommendations,
        }
    }
}
