//! Tags and tag sets: the values of a single filter dimension

use crate::ids::new_id;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single user-entered filter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Unique within its tag set, never reused
    pub id: String,
    /// Trimmed, non-empty value
    pub text: String,
}

impl Tag {
    /// Create a tag with a fresh id. The text is trimmed.
    pub fn new(text: &str) -> Self {
        Self {
            id: new_id(),
            text: text.trim().to_string(),
        }
    }
}

/// Ordered collection of tags for one filter dimension.
///
/// Text duplicates are allowed; only ids are unique.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagSet {
    tags: Vec<Tag>,
}

impl TagSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set of fresh-id tags, skipping blank values
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::new();
        set.extend_texts(texts);
        set
    }

    /// Append a tag. Blank text is ignored and returns `None`.
    pub fn add(&mut self, text: &str) -> Option<&Tag> {
        if text.trim().is_empty() {
            return None;
        }
        self.tags.push(Tag::new(text));
        self.tags.last()
    }

    /// Append every non-blank value with a fresh id
    pub fn extend_texts<I, S>(&mut self, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for text in texts {
            self.add(text.as_ref());
        }
    }

    /// Remove the tag with the given id. Returns false when nothing matched.
    pub fn remove_by_id(&mut self, id: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t.id != id);
        self.tags.len() != before
    }

    /// Install `tags` verbatim; id uniqueness is the caller's responsibility
    pub fn replace_all(&mut self, tags: Vec<Tag>) {
        self.tags = tags;
    }

    pub fn clear(&mut self) {
        self.tags.clear();
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Tag> {
        self.tags.iter()
    }

    /// Tag texts in insertion order
    pub fn texts(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.text.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = std::slice::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.tags.iter()
    }
}

/// The six filter dimensions of a search specification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Sites,
    ExcludeSites,
    FileTypes,
    WordsInTitle,
    WordsInUrl,
    ExcludeWords,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Self::Sites,
        Self::ExcludeSites,
        Self::FileTypes,
        Self::WordsInTitle,
        Self::WordsInUrl,
        Self::ExcludeWords,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sites => "sites",
            Self::ExcludeSites => "excludeSites",
            Self::FileTypes => "fileTypes",
            Self::WordsInTitle => "wordsInTitle",
            Self::WordsInUrl => "wordsInUrl",
            Self::ExcludeWords => "excludeWords",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dimension {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown filter dimension: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_trims_and_skips_blank() {
        let mut set = TagSet::new();
        assert!(set.add("   ").is_none());
        let tag = set.add("  example.com ").unwrap();
        assert_eq!(tag.text, "example.com");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_duplicate_text_gets_distinct_ids() {
        let mut set = TagSet::new();
        let first = set.add("pdf").unwrap().id.clone();
        assert_eq!(set.len(), 1);
        let second = set.add("pdf").unwrap().id.clone();
        assert_eq!(set.len(), 2);
        assert_ne!(first, second);
    }

    #[test]
    fn test_remove_by_id() {
        let mut set = TagSet::from_texts(["a", "b"]);
        let id = set.iter().next().unwrap().id.clone();

        assert!(set.remove_by_id(&id));
        assert!(!set.remove_by_id(&id));
        assert_eq!(set.texts(), vec!["b"]);
    }

    #[test]
    fn test_replace_all_and_clear() {
        let mut set = TagSet::from_texts(["a"]);
        set.replace_all(vec![Tag::new("x"), Tag::new("y")]);
        assert_eq!(set.texts(), vec!["x", "y"]);

        set.clear();
        assert!(set.is_empty());
    }

    #[test]
    fn test_dimension_parse() {
        assert_eq!("wordsInUrl".parse::<Dimension>(), Ok(Dimension::WordsInUrl));
        assert_eq!("excludesites".parse::<Dimension>(), Ok(Dimension::ExcludeSites));
        assert!("nope".parse::<Dimension>().is_err());
    }
}
