//! The structured search specification and its plain-string shapes

use super::tags::{Dimension, TagSet};
use serde::{Deserialize, Serialize};

/// Complete structured filter state compiled into a query string
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchSpecification {
    /// Free text, never auto-quoted
    pub free_text: String,
    /// OR-combined inclusion
    pub sites: TagSet,
    /// AND-combined exclusion
    pub exclude_sites: TagSet,
    /// OR-combined inclusion
    pub file_types: TagSet,
    /// OR-combined inclusion, phrase-quoted
    pub words_in_title: TagSet,
    /// OR-combined inclusion, phrase-quoted
    pub words_in_url: TagSet,
    /// AND-combined exclusion, phrase-quoted
    pub exclude_words: TagSet,
}

impl SearchSpecification {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tags(&self, dimension: Dimension) -> &TagSet {
        match dimension {
            Dimension::Sites => &self.sites,
            Dimension::ExcludeSites => &self.exclude_sites,
            Dimension::FileTypes => &self.file_types,
            Dimension::WordsInTitle => &self.words_in_title,
            Dimension::WordsInUrl => &self.words_in_url,
            Dimension::ExcludeWords => &self.exclude_words,
        }
    }

    pub fn tags_mut(&mut self, dimension: Dimension) -> &mut TagSet {
        match dimension {
            Dimension::Sites => &mut self.sites,
            Dimension::ExcludeSites => &mut self.exclude_sites,
            Dimension::FileTypes => &mut self.file_types,
            Dimension::WordsInTitle => &mut self.words_in_title,
            Dimension::WordsInUrl => &mut self.words_in_url,
            Dimension::ExcludeWords => &mut self.exclude_words,
        }
    }

    /// Plain-string view of the six dimensions
    pub fn tag_lists(&self) -> TagLists {
        let mut lists = TagLists::default();
        for dimension in Dimension::ALL {
            *lists.get_mut(dimension) = self.tags(dimension).texts();
        }
        lists
    }

    /// Reset free text and every dimension
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when there is neither free text nor any tag
    pub fn is_empty(&self) -> bool {
        self.free_text.trim().is_empty() && Dimension::ALL.iter().all(|d| self.tags(*d).is_empty())
    }
}

/// Plain strings for each dimension, as carried by presets and shortcuts
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TagLists {
    pub sites: Vec<String>,
    pub exclude_sites: Vec<String>,
    pub file_types: Vec<String>,
    pub words_in_title: Vec<String>,
    pub words_in_url: Vec<String>,
    pub exclude_words: Vec<String>,
}

impl TagLists {
    pub fn get(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::Sites => &self.sites,
            Dimension::ExcludeSites => &self.exclude_sites,
            Dimension::FileTypes => &self.file_types,
            Dimension::WordsInTitle => &self.words_in_title,
            Dimension::WordsInUrl => &self.words_in_url,
            Dimension::ExcludeWords => &self.exclude_words,
        }
    }

    pub fn get_mut(&mut self, dimension: Dimension) -> &mut Vec<String> {
        match dimension {
            Dimension::Sites => &mut self.sites,
            Dimension::ExcludeSites => &mut self.exclude_sites,
            Dimension::FileTypes => &mut self.file_types,
            Dimension::WordsInTitle => &mut self.words_in_title,
            Dimension::WordsInUrl => &mut self.words_in_url,
            Dimension::ExcludeWords => &mut self.exclude_words,
        }
    }

    pub fn is_empty(&self) -> bool {
        Dimension::ALL.iter().all(|d| self.get(*d).is_empty())
    }
}

/// Payload of the advanced search panel. Omitted fields mean "empty".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvancedSearch {
    pub query: String,
    #[serde(flatten)]
    pub tags: TagLists,
}
