//! Settings structures for Dorksmith configuration

use crate::engines::SearchEngine;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main settings structure matching settings.yml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub search: SearchSettings,
    pub storage: StorageSettings,
    pub ai: AiSettings,
    pub outgoing: OutgoingSettings,
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Merge with environment variables (DORKSMITH_* prefix)
    pub fn merge_env(&mut self) {
        if let Ok(val) = std::env::var("DORKSMITH_DEBUG") {
            self.general.debug = val.parse().unwrap_or(false);
        }
        if let Ok(val) = std::env::var("DORKSMITH_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("DORKSMITH_BIND_ADDRESS") {
            self.server.bind_address = val;
        }
        if let Ok(val) = std::env::var("DORKSMITH_STORAGE_PATH") {
            self.storage.path = Some(PathBuf::from(val));
        }
    }
}

/// General settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Enable debug logging
    pub debug: bool,
    /// Instance name reported by the API
    pub instance_name: String,
    /// Persist the working specification and restore it on startup
    pub restore_last_state: bool,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            debug: false,
            instance_name: "Dorksmith".to_string(),
            restore_last_state: true,
        }
    }
}

/// Server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Server port
    pub port: u16,
    /// Bind address
    pub bind_address: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            port: 8787,
            bind_address: "127.0.0.1".to_string(),
        }
    }
}

/// Search and history behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Engine used until the user picks one
    pub default_engine: SearchEngine,
    /// History cap; `null` keeps every entry
    pub history_limit: Option<usize>,
    /// Number of recent search terms kept
    pub recent_terms_limit: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_engine: SearchEngine::Google,
            history_limit: Some(crate::SESSION_HISTORY_LIMIT),
            recent_terms_limit: crate::RECENT_TERMS_LIMIT,
        }
    }
}

/// Durable store settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Store file; defaults to the platform data directory
    pub path: Option<PathBuf>,
    /// Keep everything in memory (nothing survives a restart)
    pub in_memory: bool,
}

/// AI assistant settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AiSettings {
    /// Completion timeout in seconds
    pub timeout_secs: u64,
    /// Maximum tokens requested from the provider
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
    /// OpenAI API base URL
    pub openai_url: String,
    /// Anthropic API base URL
    pub anthropic_url: String,
    /// Gemini API base URL
    pub gemini_url: String,
}

impl Default for AiSettings {
    fn default() -> Self {
        Self {
            timeout_secs: crate::DEFAULT_AI_TIMEOUT_SECS,
            max_tokens: 300,
            temperature: 0.2,
            openai_url: "https://api.openai.com".to_string(),
            anthropic_url: "https://api.anthropic.com".to_string(),
            gemini_url: "https://generativelanguage.googleapis.com".to_string(),
        }
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Default request timeout in seconds
    pub request_timeout: f64,
    /// Verify SSL certificates
    pub verify_ssl: bool,
    /// Proxy settings
    pub proxies: ProxySettings,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 60.0,
            verify_ssl: true,
            proxies: ProxySettings::default(),
        }
    }
}

/// Proxy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxySettings {
    pub http: Option<String>,
    pub https: Option<String>,
    pub all: Option<String>,
}
