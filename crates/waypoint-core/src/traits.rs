use crate::types::Opportunity;

/// Relevance scoring between a query (or profile) and one item.
///
/// Implementations must be pure: the same inputs always give the same score,
/// and the score is never negative. A score of zero means "not relevant".
pub trait Scorer<Q: ?Sized, T>: Send + Sync {
    fn score(&self, query: &Q, item: &T) -> f64;
}

/// The two fields that identify one real-world entity across sources.
pub trait CompositeKey {
    fn key_parts(&self) -> (&str, &str);
}

impl CompositeKey for Opportunity {
    fn key_parts(&self) -> (&str, &str) {
        (&self.title, &self.organization)
    }
}
