use futures::future::join_all;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tracing::{debug, info, warn};

use waypoint_core::config::{CacheSettings, MatchSettings};
use waypoint_core::types::{FilterSet, ItemId, Opportunity, Profile, ScoredItem};
use waypoint_core::{Error, Result};
use waypoint_rank::rank;

use crate::cache::{derive_key, CacheStats, Clock, SystemClock, TtlCache};
use crate::dedupe::dedupe;
use crate::profile_scorer::{passes_filters, MatchBreakdown, ProfileScorer};
use crate::source::OpportunitySource;

/// Ranked opportunities plus their per-listing breakdowns, keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MatchResults {
    pub hits: Vec<ScoredItem<Opportunity>>,
    pub details: HashMap<ItemId, MatchBreakdown>,
}

impl MatchResults {
    pub fn is_empty(&self) -> bool { self.hits.is_empty() }
    pub fn len(&self) -> usize { self.hits.len() }
    pub fn ids(&self) -> Vec<&str> { self.hits.iter().map(|h| h.item.id.as_str()).collect() }
}

/// Fans out to every registered source, merges and dedupes the listings,
/// scores them against a profile and memoizes the ranked result per
/// (profile, filters) for the configured TTL.
pub struct OpportunityMatcher {
    sources: Vec<Arc<dyn OpportunitySource>>,
    scorer: ProfileScorer,
    settings: MatchSettings,
    ttl: Duration,
    cache: Mutex<TtlCache<MatchResults>>,
}

impl OpportunityMatcher {
    pub fn new(settings: MatchSettings, cache: &CacheSettings) -> Self {
        Self {
            sources: Vec::new(),
            scorer: ProfileScorer::new(settings.clone()),
            settings,
            ttl: Duration::from_secs(cache.opportunity_ttl_secs),
            cache: Mutex::new(TtlCache::with_clock(Arc::new(SystemClock))),
        }
    }

    /// Replace the expiry clock. Drops anything already cached.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.cache = Mutex::new(TtlCache::with_clock(clock));
        self
    }

    pub fn with_source(mut self, source: Arc<dyn OpportunitySource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn add_source(&mut self, source: Arc<dyn OpportunitySource>) { self.sources.push(source); }

    pub fn source_names(&self) -> Vec<&str> { self.sources.iter().map(|s| s.name()).collect() }

    pub fn ttl(&self) -> Duration { self.ttl }

    /// Ranked opportunities for `profile`. Served from cache while the entry
    /// for this (profile, filters) pair is fresh.
    pub async fn fetch_scored(&self, profile: &Profile, filters: &FilterSet) -> Result<MatchResults> {
        let key = derive_key(&profile.canonical(), filters);
        let cached = {
            let mut cache = self.lock_cache()?;
            cache.get(&key)
        };
        if let Some(hit) = cached {
            debug!(profile = %profile.id, hits = hit.len(), "Opportunity cache hit");
            return Ok(hit);
        }

        let listings = self.fetch_all(filters).await;
        let results = self.score_listings(profile, filters, listings);
        info!(profile = %profile.id, hits = results.len(), "Scored opportunities");

        self.lock_cache()?.insert(key, self.ttl, results.clone());
        Ok(results)
    }

    /// Query all sources concurrently. A failing source is logged and
    /// contributes nothing; listings keep source registration order.
    pub async fn fetch_all(&self, filters: &FilterSet) -> Vec<Opportunity> {
        let fetches = self.sources.iter().map(|source| source.fetch(filters));
        let outcomes = join_all(fetches).await;

        let mut merged = Vec::new();
        for (source, outcome) in self.sources.iter().zip(outcomes) {
            match outcome {
                Ok(mut listings) => {
                    debug!(source = source.name(), count = listings.len(), "Fetched listings");
                    for listing in listings.iter_mut().filter(|l| l.source.is_empty()) {
                        listing.source = source.name().to_string();
                    }
                    merged.extend(listings);
                }
                Err(e) => warn!(source = source.name(), error = %e, "Source failed; skipping"),
            }
        }
        merged
    }

    /// Dedupe, gate, score and rank an already-fetched listing set.
    pub fn score_listings(&self, profile: &Profile, filters: &FilterSet, listings: Vec<Opportunity>) -> MatchResults {
        let mut eligible: Vec<Opportunity> =
            dedupe(listings).into_iter().filter(|o| passes_filters(filters, o)).collect();
        disambiguate_ids(&mut eligible);

        let jitter = if self.settings.jitter.is_finite() { self.settings.jitter.max(0.0) } else { 0.0 };
        let randomized = self.settings.shuffle || jitter > 0.0;
        let mut rng = match self.settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None if randomized => StdRng::from_entropy(),
            None => StdRng::seed_from_u64(0),
        };
        if self.settings.shuffle {
            eligible.shuffle(&mut rng);
        }

        let mut breakdowns: Vec<MatchBreakdown> = eligible.iter().map(|o| self.scorer.breakdown(profile, o)).collect();
        if jitter > 0.0 {
            for b in &mut breakdowns {
                b.jitter = rng.gen_range(0.0..jitter);
            }
        }
        let scores: Vec<f64> = breakdowns.iter().map(MatchBreakdown::total).collect();
        let hits = rank(&eligible, &scores, self.settings.limit);

        let mut by_id: HashMap<ItemId, MatchBreakdown> =
            eligible.iter().map(|o| o.id.clone()).zip(breakdowns).collect();
        let details = hits
            .iter()
            .filter_map(|h| by_id.remove(&h.item.id).map(|b| (h.item.id.clone(), b)))
            .collect();
        MatchResults { hits, details }
    }

    pub fn invalidate(&self, profile: &Profile, filters: &FilterSet) -> Result<bool> {
        let key = derive_key(&profile.canonical(), filters);
        Ok(self.lock_cache()?.invalidate(&key))
    }

    pub fn clear_cache(&self) -> Result<()> {
        self.lock_cache()?.clear();
        Ok(())
    }

    pub fn purge_expired(&self) -> Result<usize> { Ok(self.lock_cache()?.purge_expired()) }

    pub fn cache_stats(&self) -> Result<CacheStats> { Ok(self.lock_cache()?.stats()) }

    fn lock_cache(&self) -> Result<MutexGuard<'_, TtlCache<MatchResults>>> {
        self.cache.lock().map_err(|_| Error::Operation("opportunity cache lock poisoned".to_string()))
    }
}

/// Ids are only unique within one source. A repeated id after the merge is
/// rewritten to `source:id` (then `source:id#n`) so the details table keys
/// each hit exactly once.
fn disambiguate_ids(listings: &mut [Opportunity]) {
    let mut seen: HashSet<ItemId> = HashSet::with_capacity(listings.len());
    for listing in listings.iter_mut() {
        if seen.contains(&listing.id) {
            let base = if listing.source.is_empty() {
                listing.id.clone()
            } else {
                format!("{}:{}", listing.source, listing.id)
            };
            let mut candidate = base.clone();
            let mut n = 2;
            while seen.contains(&candidate) {
                candidate = format!("{base}#{n}");
                n += 1;
            }
            debug!(from = %listing.id, to = %candidate, "Renamed colliding listing id");
            listing.id = candidate;
        }
        seen.insert(listing.id.clone());
    }
}
