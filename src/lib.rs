//! Dorksmith: an advanced web-search query builder
//!
//! Structured filters (sites, file types, title and URL words, exclusions)
//! compile into a single operator-annotated query string. Presets, shortcuts,
//! history entries and AI-generated text are merged back into the structured
//! specification through one merge engine.

pub mod ai;
pub mod config;
pub mod engines;
pub mod history;
pub mod ids;
pub mod merge;
pub mod network;
pub mod presets;
pub mod query;
pub mod session;
pub mod storage;
pub mod web;

pub use config::Settings;
pub use query::{compile, SearchSpecification};
pub use session::Session;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// History cap of the session ledger
pub const SESSION_HISTORY_LIMIT: usize = 10;

/// Number of recent search terms kept
pub const RECENT_TERMS_LIMIT: usize = 10;

/// Default AI completion timeout in seconds
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;
