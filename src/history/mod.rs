//! Search history
//!
//! The ledger of executed queries with filtering, sorting, statistics and
//! import/export, plus the short list of recently searched terms.

mod ledger;
mod models;
mod terms;

pub use ledger::HistoryLedger;
pub use models::{DateRange, HistoryEntry, HistoryFilter, HistoryStats, SortMode};
pub use terms::RecentTerms;
