//! waypoint-engine
//!
//! One facade over knowledge search, adaptive question selection, opportunity
//! matching and insight reports.
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

use waypoint_adaptive::{AdaptiveSelector, InsightGenerator, InsightReport, PerformanceLedger, StudySession};
use waypoint_core::catalog_loader::CatalogLoader;
use waypoint_core::config::{resolve_with_base, Config, Settings};
use waypoint_core::types::{Catalog, CatalogItem, Difficulty, FilterSet, Profile, Query};
use waypoint_core::{Error, Result};
use waypoint_match::{OpportunityMatcher, OpportunitySource, StaticSource};
use waypoint_rank::{KnowledgeBase, SearchResults};

pub use waypoint_match::MatchResults;

pub struct Engine {
    settings: Settings,
    knowledge: KnowledgeBase,
    subjects: HashMap<String, Arc<Catalog>>,
    matcher: OpportunityMatcher,
    insights: InsightGenerator,
    selector: AdaptiveSelector,
}

impl Engine {
    /// Build from already-loaded catalogs. No opportunity sources are
    /// registered; add them with [`with_source`](Self::with_source).
    pub fn new(settings: Settings, knowledge: Catalog, subjects: Vec<Catalog>) -> Self {
        let mut by_id = HashMap::with_capacity(subjects.len());
        for catalog in subjects {
            let id = catalog.subject().to_string();
            if by_id.insert(id.clone(), Arc::new(catalog)).is_some() {
                warn!(subject = %id, "Duplicate subject catalog; keeping the last one");
            }
        }
        Self {
            knowledge: KnowledgeBase::new(knowledge, settings.scoring.clone(), &settings.rank),
            matcher: OpportunityMatcher::new(settings.matching.clone(), &settings.cache),
            insights: InsightGenerator::new(settings.insights.clone()),
            selector: AdaptiveSelector::from_settings(&settings.adaptive),
            subjects: by_id,
            settings,
        }
    }

    /// Load every catalog named in `settings.data`, resolving relative paths
    /// against `base`. Missing knowledge or opportunity files and a missing
    /// subjects directory leave that part empty; malformed files are errors.
    pub fn load(settings: Settings, base: &Path) -> Result<Self> {
        let loader = CatalogLoader::new();

        let knowledge_path = resolve_with_base(base, &settings.data.knowledge_path);
        let knowledge = match loader.load_catalog(&knowledge_path, "knowledge") {
            Ok(catalog) => catalog,
            Err(Error::NotFound(what)) => {
                warn!(missing = %what, "No knowledge catalog; search will return nothing");
                Catalog::new("knowledge", Vec::new())
            }
            Err(e) => return Err(e),
        };

        let subjects_dir = resolve_with_base(base, &settings.data.subjects_dir);
        let subjects = match loader.load_subjects_dir(&subjects_dir) {
            Ok(catalogs) => catalogs,
            Err(Error::NotFound(what)) => {
                warn!(missing = %what, "No subject catalogs");
                Vec::new()
            }
            Err(e) => return Err(e),
        };

        let opportunities_path = resolve_with_base(base, &settings.data.opportunities_path);
        let listings = match loader.load_opportunities(&opportunities_path) {
            Ok(listings) => Some(listings),
            Err(Error::NotFound(what)) => {
                warn!(missing = %what, "No local opportunity listings");
                None
            }
            Err(e) => return Err(e),
        };

        let mut engine = Self::new(settings, knowledge, subjects);
        if let Some(listings) = listings {
            engine.matcher.add_source(Arc::new(StaticSource::new("local", listings)));
        }
        info!(
            knowledge = engine.knowledge.catalog().len(),
            subjects = engine.subjects.len(),
            sources = engine.matcher.source_names().len(),
            "Engine ready"
        );
        Ok(engine)
    }

    /// Layered configuration plus catalog loading in one step.
    pub fn from_config(config: &Config, base: &Path) -> anyhow::Result<Self> {
        let settings = config.settings()?;
        Ok(Self::load(settings, base)?)
    }

    pub fn with_source(mut self, source: Arc<dyn OpportunitySource>) -> Self {
        self.matcher.add_source(source);
        self
    }

    /// Swap in a preconfigured matcher (custom clock, sources).
    pub fn with_matcher(mut self, matcher: OpportunityMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    pub fn settings(&self) -> &Settings { &self.settings }

    pub fn knowledge(&self) -> &KnowledgeBase { &self.knowledge }

    pub fn matcher(&self) -> &OpportunityMatcher { &self.matcher }

    pub fn subject_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.subjects.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn subject(&self, subject_id: &str) -> Result<Arc<Catalog>> {
        self.subjects
            .get(subject_id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("subject catalog '{subject_id}'")))
    }

    /// Ranked knowledge items for free text, optionally restricted to one
    /// category.
    pub fn search_catalog(&self, text: &str, category: Option<&str>) -> SearchResults {
        let mut query = Query::new(text);
        if let Some(category) = category {
            query = query.with_category(category);
        }
        let results = self.knowledge.search(&query);
        debug!(query = %text, category = ?category, hits = results.len(), "search_catalog");
        results
    }

    /// Up to `count` unanswered questions at `target`, widening to the rest
    /// of the subject when that level is used up.
    pub fn get_adaptive_items(
        &self,
        subject_id: &str,
        ledger: &PerformanceLedger,
        target: Difficulty,
        count: usize,
    ) -> Result<Vec<CatalogItem>> {
        let catalog = self.subject(subject_id)?;
        let items = self.selector.select(&catalog, ledger, target, count);
        debug!(subject = %subject_id, target = %target, picked = items.len(), "get_adaptive_items");
        Ok(items)
    }

    pub async fn fetch_scored_opportunities(&self, profile: &Profile, filters: &FilterSet) -> Result<MatchResults> {
        self.matcher.fetch_scored(profile, filters).await
    }

    pub fn build_insight_report(&self, subject_id: &str, ledger: &PerformanceLedger) -> Result<InsightReport> {
        let catalog = self.subject(subject_id)?;
        Ok(self.insights.report(&catalog, ledger))
    }

    pub fn start_session(&self, subject_id: &str, start: Difficulty) -> Result<StudySession> {
        let catalog = self.subject(subject_id)?;
        info!(subject = %subject_id, start = %start, questions = catalog.len(), "Starting study session");
        Ok(StudySession::new(catalog, start, &self.settings.adaptive))
    }
}
