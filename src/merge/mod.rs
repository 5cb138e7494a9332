//! Specification merge engine
//!
//! Every external source that can change the current specification goes
//! through [`apply_to_specification`]. The policy depends on the source kind:
//! - presets and the advanced panel replace everything
//! - shortcuts append to what is already there
//! - history entries and generated text only set the free text

use crate::presets::{Preset, Shortcut};
use crate::query::{parse_operator, AdvancedSearch, Dimension, SearchSpecification, TagLists, TagSet};
use tracing::debug;

/// A source of changes for the search specification
#[derive(Debug, Clone, Copy)]
pub enum SpecSource<'a> {
    Preset(&'a Preset),
    Shortcut(&'a Shortcut),
    AdvancedPanel(&'a AdvancedSearch),
    /// Raw compiled query of a history entry
    HistoryText(&'a str),
    /// Raw query produced by the AI assistant
    GeneratedText(&'a str),
}

impl SpecSource<'_> {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Preset(_) => "preset",
            Self::Shortcut(_) => "shortcut",
            Self::AdvancedPanel(_) => "advanced",
            Self::HistoryText(_) => "history",
            Self::GeneratedText(_) => "generated",
        }
    }
}

/// Apply `source` onto `spec`. Never fails; absent or empty fields are skipped.
pub fn apply_to_specification(spec: &mut SearchSpecification, source: SpecSource<'_>) {
    debug!("Applying {} source to specification", source.kind());

    match source {
        SpecSource::Preset(preset) => replace_all(spec, &preset.query, &preset.tags),
        SpecSource::AdvancedPanel(advanced) => replace_all(spec, &advanced.query, &advanced.tags),
        SpecSource::Shortcut(shortcut) => append(spec, shortcut),
        SpecSource::HistoryText(text) | SpecSource::GeneratedText(text) => {
            spec.free_text = text.to_string();
        }
    }
}

/// Full overwrite: free text and every dimension, fresh ids per application
fn replace_all(spec: &mut SearchSpecification, query: &str, tags: &TagLists) {
    spec.free_text = query.to_string();
    for dimension in Dimension::ALL {
        *spec.tags_mut(dimension) = TagSet::from_texts(tags.get(dimension));
    }
}

/// Additive merge for shortcuts
fn append(spec: &mut SearchSpecification, shortcut: &Shortcut) {
    if let Some(query) = shortcut.query.as_deref().filter(|q| !q.trim().is_empty()) {
        spec.free_text = query.to_string();
    }

    for dimension in Dimension::ALL {
        spec.tags_mut(dimension)
            .extend_texts(shortcut.tags.get(dimension));
    }

    for raw in &shortcut.operators {
        match parse_operator(raw) {
            Some((dimension, value)) => {
                spec.tags_mut(dimension).add(&value);
            }
            None => debug!("Skipping unrecognized operator in shortcut {}: {}", shortcut.id, raw),
        }
    }
}
