//! AI provider configuration owned by the session

use super::provider::{AiError, ProviderKind};
use serde::{Deserialize, Serialize};
use url::Url;

/// Shown alongside the configuration wherever it is displayed.
pub const STORAGE_DISCLAIMER: &str = "The API key is stored in plain text on this machine. \
This is not secure storage; use a key you can revoke.";

/// Provider, model and credentials for the AI assistant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AiConfig {
    pub provider: ProviderKind,
    pub model: String,
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub configured: bool,
}

impl AiConfig {
    /// Build a validated configuration. A blank model falls back to the
    /// provider's default.
    pub fn new(
        provider: ProviderKind,
        model: &str,
        api_key: &str,
        endpoint: Option<&str>,
    ) -> Result<Self, AiError> {
        let model = match model.trim() {
            "" => provider.default_model().unwrap_or_default().to_string(),
            m => m.to_string(),
        };
        let endpoint = endpoint
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .map(str::to_string);

        let mut config = Self {
            provider,
            model,
            api_key: api_key.trim().to_string(),
            endpoint,
            configured: false,
        };
        config.validate()?;
        config.configured = true;
        Ok(config)
    }

    /// Check that every field the provider needs is present
    pub fn validate(&self) -> Result<(), AiError> {
        if self.model.trim().is_empty() {
            return Err(AiError::NotConfigured("missing model".to_string()));
        }
        if self.provider.requires_key() && self.api_key.trim().is_empty() {
            return Err(AiError::NotConfigured("missing API key".to_string()));
        }
        if self.provider == ProviderKind::Custom {
            let endpoint = self
                .endpoint
                .as_deref()
                .ok_or_else(|| AiError::NotConfigured("missing endpoint".to_string()))?;
            let url = Url::parse(endpoint)
                .map_err(|e| AiError::NotConfigured(format!("invalid endpoint: {}", e)))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(AiError::NotConfigured(format!(
                    "unsupported endpoint scheme '{}'",
                    url.scheme()
                )));
            }
        }
        Ok(())
    }

    /// Ready to use: explicitly configured and complete
    pub fn ensure_ready(&self) -> Result<(), AiError> {
        if !self.configured {
            return Err(AiError::NotConfigured("no provider configured".to_string()));
        }
        self.validate()
    }

    pub fn is_ready(&self) -> bool {
        self.ensure_ready().is_ok()
    }

    /// Public view with the key masked
    pub fn view(&self) -> AiConfigView {
        AiConfigView {
            provider: self.provider,
            model: self.model.clone(),
            api_key: mask_key(&self.api_key),
            endpoint: self.endpoint.clone(),
            configured: self.configured,
            disclaimer: STORAGE_DISCLAIMER,
        }
    }
}

/// What the API returns for the configuration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConfigView {
    pub provider: ProviderKind,
    pub model: String,
    pub api_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
    pub configured: bool,
    pub disclaimer: &'static str,
}

fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    match chars.len() {
        0 => String::new(),
        n if n <= 8 => "*".repeat(n),
        n => {
            let head: String = chars[..3].iter().collect();
            let tail: String = chars[n - 4..].iter().collect();
            format!("{}****{}", head, tail)
        }
    }
}
