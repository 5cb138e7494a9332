//! Preset and shortcut data models

use crate::ids::new_id;
use crate::query::{SearchSpecification, TagLists};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named, reusable, full search specification template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    /// Stable string for built-ins, generated for user presets
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Free-text template, may be empty
    #[serde(default)]
    pub query: String,
    pub tags: TagLists,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default = "Utc::now")]
    pub created_at: DateTime<Utc>,
}

impl Preset {
    /// Snapshot a specification as a new user preset
    pub fn from_specification(
        spec: &SearchSpecification,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
            description: description.into(),
            query: spec.free_text.trim().to_string(),
            tags: spec.tag_lists(),
            is_favorite: false,
            created_at: Utc::now(),
        }
    }
}

/// A named, partial and additive search specification template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shortcut {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Replaces the free text only when non-empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    /// Values appended per dimension; empty dimensions are left alone
    #[serde(default)]
    pub tags: TagLists,
    /// Raw operator strings such as `intitle:"index of"`
    #[serde(default)]
    pub operators: Vec<String>,
}

/// A preset as it appears in an import document, before validation
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ImportedPreset {
    pub id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub query: Option<String>,
    pub tags: Option<TagLists>,
    #[serde(default)]
    pub is_favorite: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_specification() {
        let mut spec = SearchSpecification::new();
        spec.free_text = " budget ".to_string();
        spec.file_types.add("xls");

        let preset = Preset::from_specification(&spec, "Budgets", "");
        assert_eq!(preset.query, "budget");
        assert_eq!(preset.tags.file_types, vec!["xls"]);
        assert!(!preset.is_favorite);
    }

    #[test]
    fn test_preset_json_shape() {
        let json = r#"{"id":"p1","name":"Docs","tags":{"fileTypes":["pdf"]}}"#;
        let preset: Preset = serde_json::from_str(json).unwrap();
        assert_eq!(preset.description, "");
        assert_eq!(preset.tags.file_types, vec!["pdf"]);

        let value = serde_json::to_value(&preset).unwrap();
        assert!(value.get("isFavorite").is_some());
        assert!(value.get("createdAt").is_some());
    }
}
