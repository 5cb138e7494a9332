//! History data models

use crate::engines::SearchEngine;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// A record of a previously executed compiled query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub query: String,
    pub timestamp: DateTime<Utc>,
    pub search_engine: SearchEngine,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// A history entry as it appears in an import document, before validation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImportedEntry {
    pub id: Option<String>,
    pub query: Option<String>,
    pub timestamp: Option<String>,
    pub search_engine: Option<String>,
    #[serde(default)]
    pub is_favorite: bool,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub notes: Option<String>,
}

/// Date window for history filtering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateRange {
    /// Same UTC calendar day as now
    Today,
    /// Last 7 days
    Week,
    /// Last 30 days
    Month,
    #[default]
    All,
}

impl DateRange {
    pub fn contains(&self, timestamp: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        match self {
            Self::Today => timestamp.date_naive() == now.date_naive(),
            Self::Week => timestamp >= now - Duration::days(7),
            Self::Month => timestamp >= now - Duration::days(30),
            Self::All => true,
        }
    }
}

/// Combination of history predicates; unset fields match everything
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryFilter {
    /// Case-insensitive substring of the query or notes
    pub text: Option<String>,
    pub category: Option<String>,
    pub engine: Option<SearchEngine>,
    pub favorites_only: bool,
    pub range: DateRange,
}

impl HistoryFilter {
    pub fn matches(&self, entry: &HistoryEntry, now: DateTime<Utc>) -> bool {
        if let Some(text) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            let needle = text.to_lowercase();
            let in_query = entry.query.to_lowercase().contains(&needle);
            let in_notes = entry
                .notes
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&needle));
            if !in_query && !in_notes {
                return false;
            }
        }

        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if entry.category.as_deref() != Some(category) {
                return false;
            }
        }

        if let Some(engine) = self.engine {
            if entry.search_engine != engine {
                return false;
            }
        }

        if self.favorites_only && !entry.is_favorite {
            return false;
        }

        self.range.contains(entry.timestamp, now)
    }
}

/// History ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortMode {
    /// Newest first
    #[default]
    Date,
    /// Ascending by query text
    Alphabetical,
    /// Most repeated query text first
    Frequency,
}

/// Derived history statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryStats {
    pub total: usize,
    pub favorites: usize,
    pub distinct_queries: usize,
    pub most_used_engine: Option<SearchEngine>,
}
