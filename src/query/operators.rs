//! Raw operator parsing
//!
//! Shortcuts may carry ready-made operator strings such as `intitle:"index of"`,
//! `inurl:admin` or `-site:pinterest.com`. These are turned back into a
//! dimension and a bare value so they can be appended as tags:
//! - `site:x` / `-site:x`
//! - `filetype:x` / `ext:x`
//! - `intitle:x` / `allintitle:x`
//! - `inurl:x` / `allinurl:x`
//! - `-"phrase"` / `-word`

use super::tags::Dimension;
use once_cell::sync::Lazy;
use regex::Regex;

static OPERATOR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(-)?(site|filetype|ext|allintitle|intitle|allinurl|inurl):(.*)$").unwrap()
});

static EXCLUSION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^-([^:]+)$").unwrap());

/// Parse a raw operator string into its dimension and value.
///
/// Returns `None` for unknown operators and empty values.
pub fn parse_operator(raw: &str) -> Option<(Dimension, String)> {
    let raw = raw.trim();

    if let Some(cap) = OPERATOR_RE.captures(raw) {
        let negated = cap.get(1).is_some();
        let dimension = match (cap[2].to_lowercase().as_str(), negated) {
            ("site", false) => Dimension::Sites,
            ("site", true) => Dimension::ExcludeSites,
            ("filetype" | "ext", false) => Dimension::FileTypes,
            ("intitle" | "allintitle", false) => Dimension::WordsInTitle,
            ("inurl" | "allinurl", false) => Dimension::WordsInUrl,
            _ => return None,
        };
        return clean_value(&cap[3]).map(|value| (dimension, value));
    }

    EXCLUSION_RE
        .captures(raw)
        .and_then(|cap| clean_value(&cap[1]))
        .map(|value| (Dimension::ExcludeWords, value))
}

/// Strip surrounding whitespace and quote characters
fn clean_value(value: &str) -> Option<String> {
    let value = value.trim().trim_matches('"').trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
