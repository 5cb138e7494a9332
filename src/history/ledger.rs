//! History ledger: ordered log of executed queries

use super::models::{HistoryEntry, HistoryFilter, HistoryStats, ImportedEntry, SortMode};
use crate::engines::SearchEngine;
use crate::ids::{imported_id, new_id};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Newest-first log of executed queries.
///
/// A bounded ledger keeps only the most recent `limit` entries; an extended
/// ledger keeps everything and is navigated with filters and sorting.
#[derive(Debug, Clone)]
pub struct HistoryLedger {
    entries: Vec<HistoryEntry>,
    limit: Option<usize>,
}

impl HistoryLedger {
    /// Ledger keeping at most `limit` entries
    pub fn bounded(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit: Some(limit),
        }
    }

    /// Ledger without a count cap
    pub fn extended() -> Self {
        Self {
            entries: Vec::new(),
            limit: None,
        }
    }

    /// Ledger with an optional cap (`None` = extended)
    pub fn with_limit(limit: Option<usize>) -> Self {
        match limit {
            Some(limit) => Self::bounded(limit),
            None => Self::extended(),
        }
    }

    /// Install previously persisted entries, re-applying the cap
    pub fn with_entries(mut self, entries: Vec<HistoryEntry>) -> Self {
        self.entries = entries;
        self.evict();
        self
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Prepend a fresh entry, evicting the oldest beyond the cap
    pub fn record(&mut self, query: &str, engine: SearchEngine) -> HistoryEntry {
        let entry = HistoryEntry {
            id: new_id(),
            query: query.to_string(),
            timestamp: Utc::now(),
            search_engine: engine,
            is_favorite: false,
            tags: None,
            category: None,
            notes: None,
        };
        debug!("Recording history entry {} for {}", entry.id, engine);

        self.entries.insert(0, entry.clone());
        self.evict();
        entry
    }

    fn evict(&mut self) {
        if let Some(limit) = self.limit {
            self.entries.truncate(limit);
        }
    }

    fn get_mut(&mut self, id: &str) -> Option<&mut HistoryEntry> {
        self.entries.iter_mut().find(|e| e.id == id)
    }

    /// Flip the favorite flag. Returns the new value, `None` when absent.
    pub fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        let entry = self.get_mut(id)?;
        entry.is_favorite = !entry.is_favorite;
        Some(entry.is_favorite)
    }

    /// Set or clear (blank) the category. Returns false when absent.
    pub fn set_category(&mut self, id: &str, category: &str) -> bool {
        match self.get_mut(id) {
            Some(entry) => {
                entry.category = non_blank(category);
                true
            }
            None => false,
        }
    }

    /// Set or clear (blank) the notes. Returns false when absent.
    pub fn set_notes(&mut self, id: &str, notes: &str) -> bool {
        match self.get_mut(id) {
            Some(entry) => {
                entry.notes = non_blank(notes);
                true
            }
            None => false,
        }
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries matching `filter`, newest first
    pub fn filter(&self, filter: &HistoryFilter, now: DateTime<Utc>) -> Vec<&HistoryEntry> {
        self.entries
            .iter()
            .filter(|e| filter.matches(e, now))
            .collect()
    }

    /// Order `entries`; frequency counts identical query text across the
    /// whole ledger. The sort is stable.
    pub fn sort<'a>(&self, mut entries: Vec<&'a HistoryEntry>, mode: SortMode) -> Vec<&'a HistoryEntry> {
        match mode {
            SortMode::Date => entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp)),
            SortMode::Alphabetical => entries.sort_by(|a, b| a.query.cmp(&b.query)),
            SortMode::Frequency => {
                let counts = self.query_counts();
                entries.sort_by(|a, b| counts[b.query.as_str()].cmp(&counts[a.query.as_str()]));
            }
        }
        entries
    }

    /// Filter then sort
    pub fn query(
        &self,
        filter: &HistoryFilter,
        mode: SortMode,
        now: DateTime<Utc>,
    ) -> Vec<&HistoryEntry> {
        self.sort(self.filter(filter, now), mode)
    }

    fn query_counts(&self) -> HashMap<&str, usize> {
        let mut counts = HashMap::new();
        for entry in &self.entries {
            *counts.entry(entry.query.as_str()).or_insert(0) += 1;
        }
        counts
    }

    /// Distinct categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .filter_map(|e| e.category.clone())
            .filter(|c| seen.insert(c.clone()))
            .collect()
    }

    pub fn stats(&self) -> HistoryStats {
        let mut engine_counts: Vec<(SearchEngine, usize)> = Vec::new();
        for entry in &self.entries {
            match engine_counts.iter_mut().find(|(e, _)| *e == entry.search_engine) {
                Some((_, count)) => *count += 1,
                None => engine_counts.push((entry.search_engine, 1)),
            }
        }

        // strict comparison keeps the first-seen engine on ties
        let mut most_used: Option<(SearchEngine, usize)> = None;
        for (engine, count) in engine_counts {
            if most_used.map_or(true, |(_, best)| count > best) {
                most_used = Some((engine, count));
            }
        }

        HistoryStats {
            total: self.entries.len(),
            favorites: self.entries.iter().filter(|e| e.is_favorite).count(),
            distinct_queries: self.query_counts().len(),
            most_used_engine: most_used.map(|(engine, _)| engine),
        }
    }

    /// Pretty-printed JSON array of all entries
    pub fn export(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.entries)
    }

    /// Import entries from a JSON array document.
    ///
    /// Entries without an id or query are dropped. Accepted entries get fresh
    /// ids; timestamps are parsed from the source or default to now. The
    /// ledger is re-sorted newest first and the cap re-applied. Returns the
    /// accepted count.
    pub fn import(&mut self, document: &str) -> Result<usize, serde_json::Error> {
        let values: Vec<serde_json::Value> = serde_json::from_str(document)?;
        let total = values.len();

        let mut taken: HashSet<String> = self.entries.iter().map(|e| e.id.clone()).collect();
        let mut imported = HashSet::new();
        let mut accepted = 0;

        for value in values {
            let Some(mut entry) = Self::validate_import(value) else {
                continue;
            };
            let mut id = imported_id(&entry.id);
            while taken.contains(&id) {
                id = imported_id(&entry.id);
            }
            taken.insert(id.clone());
            imported.insert(id.clone());
            entry.id = id;

            self.entries.push(entry);
            accepted += 1;
        }

        if accepted < total {
            warn!("Skipped {} malformed history entries during import", total - accepted);
        }

        self.entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        self.evict();

        let kept = self
            .entries
            .iter()
            .filter(|e| imported.contains(&e.id))
            .count();
        if kept < accepted {
            warn!("Dropped {} imported history entries beyond the cap", accepted - kept);
        }
        info!("Imported {} history entries", kept);
        Ok(kept)
    }

    fn validate_import(value: serde_json::Value) -> Option<HistoryEntry> {
        let imported: ImportedEntry = serde_json::from_value(value).ok()?;
        let query = imported.query.filter(|q| !q.trim().is_empty())?;

        let timestamp = imported
            .timestamp
            .as_deref()
            .and_then(|t| DateTime::parse_from_rfc3339(t).ok())
            .map(|t| t.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        let search_engine = imported
            .search_engine
            .as_deref()
            .and_then(|e| e.parse().ok())
            .unwrap_or_default();

        Some(HistoryEntry {
            id: imported.id?,
            query,
            timestamp,
            search_engine,
            is_favorite: imported.is_favorite,
            tags: imported.tags,
            category: imported.category,
            notes: imported.notes,
        })
    }
}

impl Default for HistoryLedger {
    fn default() -> Self {
        Self::bounded(crate::SESSION_HISTORY_LIMIT)
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
