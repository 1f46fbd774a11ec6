//! waypoint-rank
//!
//! Additive relevance scoring, deterministic top-K ranking and the
//! knowledge-base search built on them.
pub mod ranker;
pub mod scorer;
pub mod search;
pub mod tokenize;

pub use ranker::{rank, rank_with, DEFAULT_LIMIT};
pub use scorer::{KnowledgeScorer, ScoreBreakdown};
pub use search::{KnowledgeBase, SearchResults};
