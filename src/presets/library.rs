//! Preset library: built-in catalog plus user presets

use super::builtin::{builtin_presets, builtin_shortcuts};
use super::models::{ImportedPreset, Preset, Shortcut};
use crate::ids::imported_id;
use crate::merge::{apply_to_specification, SpecSource};
use crate::query::SearchSpecification;
use chrono::Utc;
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised by preset library operations
#[derive(Debug, Error)]
pub enum PresetError {
    #[error("Preset not found: {0}")]
    NotFound(String),

    #[error("Built-in preset cannot be modified: {0}")]
    BuiltinProtected(String),

    #[error("Invalid preset document: {0}")]
    InvalidDocument(#[from] serde_json::Error),
}

/// Catalog of built-in and user presets and the built-in shortcuts
#[derive(Debug, Clone)]
pub struct PresetLibrary {
    builtins: Vec<Preset>,
    user: Vec<Preset>,
    shortcuts: Vec<Shortcut>,
}

impl PresetLibrary {
    /// Seed the built-ins and install previously persisted user presets
    pub fn new(user: Vec<Preset>) -> Self {
        Self {
            builtins: builtin_presets(),
            user,
            shortcuts: builtin_shortcuts(),
        }
    }

    /// All presets, built-ins first
    pub fn list(&self) -> impl Iterator<Item = &Preset> {
        self.builtins.iter().chain(self.user.iter())
    }

    /// User presets only (the persisted subset)
    pub fn user_presets(&self) -> &[Preset] {
        &self.user
    }

    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.list().find(|p| p.id == id)
    }

    pub fn is_builtin(&self, id: &str) -> bool {
        self.builtins.iter().any(|p| p.id == id)
    }

    pub fn shortcuts(&self) -> &[Shortcut] {
        &self.shortcuts
    }

    pub fn shortcut(&self, id: &str) -> Option<&Shortcut> {
        self.shortcuts.iter().find(|s| s.id == id)
    }

    /// Ids of built-ins currently marked favorite
    pub fn builtin_favorites(&self) -> Vec<String> {
        self.builtins
            .iter()
            .filter(|p| p.is_favorite)
            .map(|p| p.id.clone())
            .collect()
    }

    /// Restore favorite marks on built-ins; unknown ids are ignored
    pub fn restore_builtin_favorites(&mut self, ids: &[String]) {
        for preset in &mut self.builtins {
            preset.is_favorite = ids.contains(&preset.id);
        }
    }

    /// Apply a preset (full replace) onto `spec`
    pub fn apply(&self, id: &str, spec: &mut SearchSpecification) -> Result<&Preset, PresetError> {
        let preset = self
            .get(id)
            .ok_or_else(|| PresetError::NotFound(id.to_string()))?;
        apply_to_specification(spec, SpecSource::Preset(preset));
        info!("Applied preset {}", preset.name);
        Ok(preset)
    }

    /// Apply a shortcut (additive) onto `spec`
    pub fn apply_shortcut(
        &self,
        id: &str,
        spec: &mut SearchSpecification,
    ) -> Result<&Shortcut, PresetError> {
        let shortcut = self
            .shortcut(id)
            .ok_or_else(|| PresetError::NotFound(id.to_string()))?;
        apply_to_specification(spec, SpecSource::Shortcut(shortcut));
        info!("Applied shortcut {}", shortcut.name);
        Ok(shortcut)
    }

    /// Save the current specification as a new user preset
    pub fn save_current_as_preset(
        &mut self,
        spec: &SearchSpecification,
        name: Option<String>,
        description: Option<String>,
    ) -> &Preset {
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Custom preset {}", self.next_custom_number()));
        let preset = Preset::from_specification(spec, name, description.unwrap_or_default());

        info!("Saved preset {} ({})", preset.name, preset.id);
        self.user.push(preset);
        &self.user[self.user.len() - 1]
    }

    /// One past the highest `Custom preset N` suffix among user presets
    fn next_custom_number(&self) -> usize {
        self.user
            .iter()
            .filter_map(|p| p.name.strip_prefix("Custom preset "))
            .filter_map(|n| n.parse::<usize>().ok())
            .max()
            .unwrap_or(0)
            + 1
    }

    /// Flip the favorite flag on any preset, built-ins included
    pub fn toggle_favorite(&mut self, id: &str) -> Result<bool, PresetError> {
        let preset = self
            .builtins
            .iter_mut()
            .chain(self.user.iter_mut())
            .find(|p| p.id == id)
            .ok_or_else(|| PresetError::NotFound(id.to_string()))?;
        preset.is_favorite = !preset.is_favorite;
        Ok(preset.is_favorite)
    }

    /// Delete a user preset. Built-ins are rejected without mutation.
    pub fn delete(&mut self, id: &str) -> Result<Preset, PresetError> {
        if self.is_builtin(id) {
            warn!("Refusing to delete built-in preset {}", id);
            return Err(PresetError::BuiltinProtected(id.to_string()));
        }
        let index = self
            .user
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| PresetError::NotFound(id.to_string()))?;
        Ok(self.user.remove(index))
    }

    /// Serialize the user presets as a pretty-printed JSON array
    pub fn export(&self) -> Result<String, PresetError> {
        Ok(serde_json::to_string_pretty(&self.user)?)
    }

    /// Import presets from a JSON array document.
    ///
    /// Entries missing an id, name or tags are dropped. Accepted entries get
    /// fresh ids so nothing local is overwritten. Returns the accepted count.
    pub fn import(&mut self, document: &str) -> Result<usize, PresetError> {
        let entries: Vec<serde_json::Value> = serde_json::from_str(document)?;
        let total = entries.len();

        let mut taken: HashSet<String> = self.list().map(|p| p.id.clone()).collect();
        let mut accepted = 0;

        for value in entries {
            let Some(preset) = Self::validate_import(value) else {
                continue;
            };

            let mut id = imported_id(&preset.id);
            while taken.contains(&id) {
                id = imported_id(&preset.id);
            }
            taken.insert(id.clone());

            debug!("Importing preset {} as {}", preset.id, id);
            self.user.push(Preset { id, ..preset });
            accepted += 1;
        }

        if accepted < total {
            warn!("Skipped {} malformed presets during import", total - accepted);
        }
        info!("Imported {} presets", accepted);
        Ok(accepted)
    }

    fn validate_import(value: serde_json::Value) -> Option<Preset> {
        let imported: ImportedPreset = serde_json::from_value(value).ok()?;
        Some(Preset {
            id: imported.id?,
            name: imported.name?,
            description: imported.description.unwrap_or_default(),
            query: imported.query.unwrap_or_default(),
            tags: imported.tags?,
            is_favorite: imported.is_favorite,
            created_at: imported.created_at.unwrap_or_else(Utc::now),
        })
    }
}

impl Default for PresetLibrary {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
