//! The session context
//!
//! One [`Session`] owns everything the user works with: the current
//! specification, history, recent terms, the preset library, preferences and
//! the AI configuration. State is read from the store once in [`Session::load`]
//! and written back explicitly after each change.

use super::error::SessionError;
use super::preferences::{Preferences, PreferencesUpdate};
use crate::ai::AiConfig;
use crate::config::Settings;
use crate::engines::SearchEngine;
use crate::history::{HistoryEntry, HistoryLedger, RecentTerms};
use crate::merge::{apply_to_specification, SpecSource};
use crate::presets::{Preset, PresetLibrary, Shortcut};
use crate::query::{compile, AdvancedSearch, Dimension, SearchSpecification, Tag};
use crate::storage::{keys, load_or_default, save, Store};
use serde::Serialize;
use tracing::{debug, error, info};

/// Result of a search: where to send the user
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchLaunch {
    pub url: String,
    pub query: String,
    pub engine: SearchEngine,
}

pub struct Session {
    spec: SearchSpecification,
    history: HistoryLedger,
    recent_terms: RecentTerms,
    library: PresetLibrary,
    preferences: Preferences,
    ai_config: AiConfig,
    restore_last_state: bool,
    store: Box<dyn Store>,
}

impl Session {
    /// Read persisted state, substituting defaults for anything absent or
    /// malformed
    pub fn load(store: Box<dyn Store>, settings: &Settings) -> Self {
        let restore_last_state = settings.general.restore_last_state;

        let spec = if restore_last_state {
            load_or_default(store.as_ref(), keys::LAST_SPECIFICATION)
        } else {
            SearchSpecification::default()
        };

        let history = HistoryLedger::with_limit(settings.search.history_limit)
            .with_entries(load_or_default(store.as_ref(), keys::HISTORY));
        let recent_terms = RecentTerms::new(settings.search.recent_terms_limit)
            .with_terms(load_or_default(store.as_ref(), keys::RECENT_TERMS));

        let mut library = PresetLibrary::new(load_or_default(store.as_ref(), keys::USER_PRESETS));
        let favorites: Vec<String> = load_or_default(store.as_ref(), keys::BUILTIN_FAVORITES);
        library.restore_builtin_favorites(&favorites);

        let preferences = load_or_default::<Option<Preferences>>(store.as_ref(), keys::PREFERENCES)
            .unwrap_or_else(|| Preferences::with_engine(settings.search.default_engine));
        let ai_config: AiConfig = load_or_default(store.as_ref(), keys::AI_CONFIG);

        info!(
            "Session loaded: {} history entries, {} user presets, AI {}",
            history.len(),
            library.user_presets().len(),
            if ai_config.is_ready() { "configured" } else { "not configured" }
        );

        Self {
            spec,
            history,
            recent_terms,
            library,
            preferences,
            ai_config,
            restore_last_state,
            store,
        }
    }

    // Accessors

    pub fn specification(&self) -> &SearchSpecification {
        &self.spec
    }

    /// Live preview of the compiled query
    pub fn compiled(&self) -> String {
        compile(&self.spec)
    }

    pub fn history(&self) -> &HistoryLedger {
        &self.history
    }

    pub fn recent_terms(&self) -> &[String] {
        self.recent_terms.terms()
    }

    pub fn library(&self) -> &PresetLibrary {
        &self.library
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn ai_config(&self) -> &AiConfig {
        &self.ai_config
    }

    // Specification editing

    pub fn set_free_text(&mut self, text: &str) {
        self.spec.free_text = text.to_string();
        self.persist_specification();
    }

    /// Add a tag to one dimension; blank text adds nothing
    pub fn add_tag(&mut self, dimension: Dimension, text: &str) -> Option<Tag> {
        let tag = self.spec.tags_mut(dimension).add(text).cloned();
        if let Some(ref tag) = tag {
            debug!("Added {} tag {}", dimension, tag.text);
            self.persist_specification();
        }
        tag
    }

    pub fn remove_tag(&mut self, dimension: Dimension, id: &str) -> bool {
        let removed = self.spec.tags_mut(dimension).remove_by_id(id);
        if removed {
            self.persist_specification();
        }
        removed
    }

    pub fn clear_dimension(&mut self, dimension: Dimension) {
        self.spec.tags_mut(dimension).clear();
        self.persist_specification();
    }

    pub fn clear_specification(&mut self) {
        self.spec.clear();
        self.persist_specification();
    }

    // Merge sources

    pub fn apply_advanced(&mut self, advanced: &AdvancedSearch) {
        apply_to_specification(&mut self.spec, SpecSource::AdvancedPanel(advanced));
        self.persist_specification();
    }

    pub fn apply_preset(&mut self, id: &str) -> Result<Preset, SessionError> {
        let preset = self.library.apply(id, &mut self.spec)?.clone();
        self.persist_specification();
        Ok(preset)
    }

    pub fn apply_shortcut(&mut self, id: &str) -> Result<Shortcut, SessionError> {
        let shortcut = self.library.apply_shortcut(id, &mut self.spec)?.clone();
        self.persist_specification();
        Ok(shortcut)
    }

    /// Load a history entry's query text as the free text
    pub fn load_history_entry(&mut self, id: &str) -> Result<HistoryEntry, SessionError> {
        let entry = self
            .history
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::HistoryNotFound(id.to_string()))?;
        apply_to_specification(&mut self.spec, SpecSource::HistoryText(&entry.query));
        self.persist_specification();
        Ok(entry)
    }

    /// Apply AI-generated query text as the free text
    pub fn apply_generated_text(&mut self, text: &str) {
        apply_to_specification(&mut self.spec, SpecSource::GeneratedText(text));
        self.persist_specification();
    }

    // Search

    /// Compile the specification and record it.
    ///
    /// An empty compiled query is rejected without touching any state. The
    /// engine defaults to the last one used and becomes the new default.
    pub fn search(&mut self, engine: Option<SearchEngine>) -> Result<SearchLaunch, SessionError> {
        let query = self.compiled();
        if query.is_empty() {
            return Err(SessionError::EmptyQuery);
        }

        let engine = engine.unwrap_or(self.preferences.last_engine);
        let url = engine.search_url(&query);

        self.history.record(&query, engine);
        self.recent_terms.push(&self.spec.free_text);
        self.preferences.last_engine = engine;
        info!("Search on {}: {}", engine, query);

        self.persist_history();
        self.persist_recent_terms();
        self.persist_preferences();

        Ok(SearchLaunch { url, query, engine })
    }

    pub fn clear_recent_terms(&mut self) {
        self.recent_terms.clear();
        self.persist_recent_terms();
    }

    // Presets

    pub fn save_preset(&mut self, name: Option<String>, description: Option<String>) -> Preset {
        let preset = self
            .library
            .save_current_as_preset(&self.spec, name, description)
            .clone();
        self.persist_presets();
        preset
    }

    pub fn toggle_preset_favorite(&mut self, id: &str) -> Result<bool, SessionError> {
        let favorite = self.library.toggle_favorite(id)?;
        self.persist_presets();
        Ok(favorite)
    }

    pub fn delete_preset(&mut self, id: &str) -> Result<Preset, SessionError> {
        let preset = self.library.delete(id)?;
        info!("Deleted preset {}", preset.name);
        self.persist_presets();
        Ok(preset)
    }

    pub fn export_presets(&self) -> Result<String, SessionError> {
        Ok(self.library.export()?)
    }

    pub fn import_presets(&mut self, document: &str) -> Result<usize, SessionError> {
        let count = self.library.import(document)?;
        self.persist_presets();
        Ok(count)
    }

    // History

    pub fn toggle_history_favorite(&mut self, id: &str) -> Result<bool, SessionError> {
        let favorite = self
            .history
            .toggle_favorite(id)
            .ok_or_else(|| SessionError::HistoryNotFound(id.to_string()))?;
        self.persist_history();
        Ok(favorite)
    }

    pub fn set_history_category(&mut self, id: &str, category: &str) -> Result<(), SessionError> {
        if !self.history.set_category(id, category) {
            return Err(SessionError::HistoryNotFound(id.to_string()));
        }
        self.persist_history();
        Ok(())
    }

    pub fn set_history_notes(&mut self, id: &str, notes: &str) -> Result<(), SessionError> {
        if !self.history.set_notes(id, notes) {
            return Err(SessionError::HistoryNotFound(id.to_string()));
        }
        self.persist_history();
        Ok(())
    }

    pub fn delete_history_entry(&mut self, id: &str) -> Result<(), SessionError> {
        if !self.history.delete(id) {
            return Err(SessionError::HistoryNotFound(id.to_string()));
        }
        self.persist_history();
        Ok(())
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        info!("History cleared");
        self.persist_history();
    }

    pub fn export_history(&self) -> Result<String, SessionError> {
        Ok(self.history.export()?)
    }

    pub fn import_history(&mut self, document: &str) -> Result<usize, SessionError> {
        let count = self.history.import(document)?;
        self.persist_history();
        Ok(count)
    }

    // Preferences and AI configuration

    pub fn update_preferences(&mut self, update: PreferencesUpdate) -> &Preferences {
        if let Some(engine) = update.last_engine {
            self.preferences.last_engine = engine;
        }
        if let Some(theme) = update.theme.filter(|t| !t.trim().is_empty()) {
            self.preferences.theme = theme.trim().to_string();
        }
        self.preferences.toggles.extend(update.toggles);
        self.persist_preferences();
        &self.preferences
    }

    pub fn set_ai_config(&mut self, config: AiConfig) {
        info!("AI provider set to {} ({})", config.provider, config.model);
        self.ai_config = config;
        save(self.store.as_mut(), keys::AI_CONFIG, &self.ai_config);
    }

    pub fn clear_ai_config(&mut self) {
        self.ai_config = AiConfig::default();
        if let Err(e) = self.store.remove(keys::AI_CONFIG) {
            error!("Failed to remove AI configuration: {}", e);
        }
    }

    // Persistence

    fn persist_specification(&mut self) {
        if self.restore_last_state {
            save(self.store.as_mut(), keys::LAST_SPECIFICATION, &self.spec);
        }
    }

    fn persist_history(&mut self) {
        save(self.store.as_mut(), keys::HISTORY, self.history.entries());
    }

    fn persist_recent_terms(&mut self) {
        save(self.store.as_mut(), keys::RECENT_TERMS, self.recent_terms.terms());
    }

    fn persist_presets(&mut self) {
        save(self.store.as_mut(), keys::USER_PRESETS, self.library.user_presets());
        save(
            self.store.as_mut(),
            keys::BUILTIN_FAVORITES,
            &self.library.builtin_favorites(),
        );
    }

    fn persist_preferences(&mut self) {
        save(self.store.as_mut(), keys::PREFERENCES, &self.preferences);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::ProviderKind;
    use crate::presets::PresetError;
    use crate::storage::{MemoryStore, StoreError};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Store handle whose contents outlive the session
    #[derive(Clone, Default)]
    struct SharedStore(Arc<Mutex<HashMap<String, String>>>);

    impl Store for SharedStore {
        fn get(&self, key: &str) -> Option<String> {
            self.0.lock().unwrap().get(key).cloned()
        }

        fn set(&mut self, key: &str, value: String) -> Result<(), StoreError> {
            self.0.lock().unwrap().insert(key.to_string(), value);
            Ok(())
        }

        fn remove(&mut self, key: &str) -> Result<(), StoreError> {
            self.0.lock().unwrap().remove(key);
            Ok(())
        }
    }

    fn session() -> Session {
        Session::load(Box::new(MemoryStore::new()), &Settings::default())
    }

    #[test]
    fn test_search_rejects_empty_query_without_mutation() {
        let mut session = session();
        let err = session.search(None).unwrap_err();
        assert!(matches!(err, SessionError::EmptyQuery));
        assert!(session.history().is_empty());
        assert!(session.recent_terms().is_empty());
    }

    #[test]
    fn test_search_records_history_and_terms() {
        let mut session = session();
        session.set_free_text("budget");
        session.add_tag(Dimension::Sites, "gov");

        let launch = session.search(Some(SearchEngine::DuckDuckGo)).unwrap();
        assert_eq!(launch.query, "budget (site:gov)");
        assert_eq!(launch.engine, SearchEngine::DuckDuckGo);
        assert!(launch.url.starts_with("https://duckduckgo.com/?q="));

        assert_eq!(session.history().len(), 1);
        assert_eq!(session.history().entries()[0].query, "budget (site:gov)");
        assert_eq!(session.recent_terms(), ["budget".to_string()]);
        assert_eq!(session.preferences().last_engine, SearchEngine::DuckDuckGo);

        // Next search without an explicit engine reuses the last one
        let launch = session.search(None).unwrap();
        assert_eq!(launch.engine, SearchEngine::DuckDuckGo);
    }

    #[test]
    fn test_state_survives_reload() {
        let store = SharedStore::default();
        let settings = Settings::default();

        let mut session = Session::load(Box::new(store.clone()), &settings);
        session.set_free_text("thesis");
        session.add_tag(Dimension::FileTypes, "pdf");
        session.search(None).unwrap();
        let saved = session.save_preset(Some("Theses".to_string()), None);
        session.toggle_preset_favorite("builtin-academic").unwrap();
        session.update_preferences(PreferencesUpdate {
            theme: Some("dark".to_string()),
            ..Default::default()
        });
        session.set_ai_config(AiConfig::new(ProviderKind::Gemini, "", "key", None).unwrap());

        let reloaded = Session::load(Box::new(store), &settings);
        assert_eq!(reloaded.compiled(), "thesis (filetype:pdf)");
        assert_eq!(reloaded.history().len(), 1);
        assert_eq!(reloaded.recent_terms(), ["thesis".to_string()]);
        assert_eq!(reloaded.library().get(&saved.id).unwrap().name, "Theses");
        assert!(reloaded.library().get("builtin-academic").unwrap().is_favorite);
        assert_eq!(reloaded.preferences().theme, "dark");
        assert!(reloaded.ai_config().is_ready());
    }

    #[test]
    fn test_specification_not_restored_when_disabled() {
        let store = SharedStore::default();
        let mut settings = Settings::default();
        settings.general.restore_last_state = false;

        let mut session = Session::load(Box::new(store.clone()), &settings);
        session.set_free_text("thesis");

        let reloaded = Session::load(Box::new(store), &settings);
        assert!(reloaded.specification().is_empty());
    }

    #[test]
    fn test_malformed_store_values_fall_back() {
        let mut store = SharedStore::default();
        store.set(keys::HISTORY, "{not json".to_string()).unwrap();
        store.set(keys::PREFERENCES, "42".to_string()).unwrap();

        let mut settings = Settings::default();
        settings.search.default_engine = SearchEngine::DuckDuckGo;

        let session = Session::load(Box::new(store), &settings);
        assert!(session.history().is_empty());
        assert_eq!(session.preferences().last_engine, SearchEngine::DuckDuckGo);
    }

    #[test]
    fn test_preset_then_shortcut() {
        let mut session = session();
        session.add_tag(Dimension::Sites, "example.com");

        session.apply_preset("builtin-documents").unwrap();
        assert!(session.specification().sites.is_empty());
        assert!(!session.specification().file_types.is_empty());

        let before = session.specification().file_types.len();
        session.apply_shortcut("shortcut-pdf").unwrap();
        assert_eq!(session.specification().file_types.len(), before + 1);
        assert_eq!(session.compiled().matches("filetype:pdf").count(), 2);
    }

    #[test]
    fn test_builtin_delete_is_rejected() {
        let mut session = session();
        let err = session.delete_preset("builtin-documents").unwrap_err();
        assert!(matches!(
            err,
            SessionError::Preset(PresetError::BuiltinProtected(_))
        ));
        assert!(session.library().get("builtin-documents").is_some());
    }

    #[test]
    fn test_history_entry_loads_as_free_text_only() {
        let mut session = session();
        session.add_tag(Dimension::Sites, "gov");
        let launch = session.search(None).unwrap();
        let id = session.history().entries()[0].id.clone();

        session.add_tag(Dimension::FileTypes, "pdf");
        session.load_history_entry(&id).unwrap();
        assert_eq!(session.specification().free_text, launch.query);
        assert_eq!(session.specification().file_types.len(), 1);

        assert!(matches!(
            session.load_history_entry("missing"),
            Err(SessionError::HistoryNotFound(_))
        ));
    }

    #[test]
    fn test_history_edits_report_missing_ids() {
        let mut session = session();
        session.set_free_text("q");
        session.search(None).unwrap();
        let id = session.history().entries()[0].id.clone();

        assert!(session.toggle_history_favorite(&id).unwrap());
        session.set_history_category(&id, "work").unwrap();
        session.set_history_notes(&id, "keep").unwrap();
        assert!(session.set_history_notes("nope", "x").is_err());

        session.delete_history_entry(&id).unwrap();
        assert!(session.delete_history_entry(&id).is_err());
    }

    #[test]
    fn test_clear_ai_config() {
        let mut session = session();
        session.set_ai_config(AiConfig::new(ProviderKind::OpenAi, "", "sk", None).unwrap());
        session.clear_ai_config();
        assert!(!session.ai_config().is_ready());
    }
}
