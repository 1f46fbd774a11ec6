//! waypoint-adaptive
//!
//! Answer ledgers, the difficulty state machine, next-question selection,
//! study sessions and insight reports.
pub mod insights;
pub mod ledger;
pub mod selector;
pub mod session;
pub mod state;

pub use insights::{Area, BucketStats, InsightGenerator, InsightReport, PerformanceBand};
pub use ledger::PerformanceLedger;
pub use selector::AdaptiveSelector;
pub use session::{Progress, StudySession};
pub use state::{AdaptiveState, Transition};
