//! User preferences

use crate::engines::SearchEngine;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Last engine, theme and miscellaneous boolean toggles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Preferences {
    pub last_engine: SearchEngine,
    pub theme: String,
    pub toggles: BTreeMap<String, bool>,
}

impl Preferences {
    pub fn with_engine(engine: SearchEngine) -> Self {
        Self {
            last_engine: engine,
            ..Self::default()
        }
    }

    /// Toggle value, `false` when never set
    pub fn toggle(&self, name: &str) -> bool {
        self.toggles.get(name).copied().unwrap_or(false)
    }
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            last_engine: SearchEngine::default(),
            theme: "system".to_string(),
            toggles: BTreeMap::new(),
        }
    }
}

/// Partial preferences update; absent fields are left alone
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PreferencesUpdate {
    pub last_engine: Option<SearchEngine>,
    pub theme: Option<String>,
    pub toggles: BTreeMap<String, bool>,
}
