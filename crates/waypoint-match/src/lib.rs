//! Opportunity matching: concurrent source fan-out, cross-source dedupe,
//! profile scoring and a TTL memo over the ranked results.

pub mod cache;
pub mod dedupe;
pub mod matcher;
pub mod profile_scorer;
pub mod source;

pub use cache::{derive_key, CacheEntry, CacheStats, Clock, ManualClock, SystemClock, TtlCache};
pub use dedupe::{dedupe, normalize_key_fragment};
pub use matcher::{MatchResults, OpportunityMatcher};
pub use profile_scorer::{passes_filters, MatchBreakdown, ProfileScorer};
pub use source::{OpportunitySource, StaticSource};
