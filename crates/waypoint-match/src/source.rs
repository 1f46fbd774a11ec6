use futures::future::BoxFuture;
use std::time::Duration;

use waypoint_core::types::{FilterSet, Opportunity};
use waypoint_core::Result;

/// An external listing provider. Implementations may pre-filter on
/// `filters`; the matcher applies the hard gates again either way.
pub trait OpportunitySource: Send + Sync {
    fn name(&self) -> &str;
    fn fetch<'a>(&'a self, filters: &'a FilterSet) -> BoxFuture<'a, Result<Vec<Opportunity>>>;
}

/// In-memory source backed by a fixed listing set, optionally slowed down
/// to mimic a network round trip.
#[derive(Debug, Clone)]
pub struct StaticSource {
    name: String,
    listings: Vec<Opportunity>,
    latency: Option<Duration>,
}

impl StaticSource {
    pub fn new(name: impl Into<String>, listings: Vec<Opportunity>) -> Self {
        let name = name.into();
        let listings = listings
            .into_iter()
            .map(|mut o| {
                if o.source.is_empty() {
                    o.source.clone_from(&name);
                }
                o
            })
            .collect();
        Self { name, listings, latency: None }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn listings(&self) -> &[Opportunity] { &self.listings }
}

impl OpportunitySource for StaticSource {
    fn name(&self) -> &str { &self.name }

    fn fetch<'a>(&'a self, _filters: &'a FilterSet) -> BoxFuture<'a, Result<Vec<Opportunity>>> {
        Box::pin(async move {
            if let Some(latency) = self.latency {
                tokio::time::sleep(latency).await;
            }
            Ok(self.listings.clone())
        })
    }
}
