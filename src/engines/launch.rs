//! Search engine launch targets

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors raised when resolving a search engine
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Unsupported search engine: {0}")]
    Unsupported(String),
}

/// Search engines a compiled query can be dispatched to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Google,
    DuckDuckGo,
}

impl SearchEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::DuckDuckGo => "duckduckgo",
        }
    }

    fn base_url(&self) -> &'static str {
        match self {
            Self::Google => "https://www.google.com/search?q=",
            Self::DuckDuckGo => "https://duckduckgo.com/?q=",
        }
    }

    /// Launch URL for a compiled query
    pub fn search_url(&self, compiled_query: &str) -> String {
        format!("{}{}", self.base_url(), urlencoding::encode(compiled_query))
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SearchEngine {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google" | "g" => Ok(Self::Google),
            "duckduckgo" | "ddg" => Ok(Self::DuckDuckGo),
            _ => Err(EngineError::Unsupported(s.to_string())),
        }
    }
}

/// Resolve an engine by name and build its launch URL.
///
/// Unknown engine names are an error, never a fallback.
pub fn launch_url(engine: &str, compiled_query: &str) -> Result<String, EngineError> {
    let engine: SearchEngine = engine.parse()?;
    Ok(engine.search_url(compiled_query))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_encodes_query() {
        let url = SearchEngine::Google.search_url(r#"foo (site:a.com) -"x""#);
        assert_eq!(
            url,
            "https://www.google.com/search?q=foo%20%28site%3Aa.com%29%20-%22x%22"
        );

        let url = SearchEngine::DuckDuckGo.search_url("a b");
        assert_eq!(url, "https://duckduckgo.com/?q=a%20b");
    }

    #[test]
    fn test_parse_engine() {
        assert_eq!("Google".parse::<SearchEngine>(), Ok(SearchEngine::Google));
        assert_eq!("ddg".parse::<SearchEngine>(), Ok(SearchEngine::DuckDuckGo));
    }

    #[test]
    fn test_unsupported_engine_fails_loudly() {
        assert_eq!(
            launch_url("bing", "x"),
            Err(EngineError::Unsupported("bing".to_string()))
        );
        assert!(serde_json::from_str::<SearchEngine>(r#""yahoo""#).is_err());
    }
}
