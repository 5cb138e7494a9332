//! Completion provider trait and types
//!
//! The assistant only depends on this contract; each provider kind maps to
//! its own wire format inside the HTTP implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Supported completion backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    #[serde(alias = "open_ai")]
    OpenAi,
    Anthropic,
    Gemini,
    /// Any OpenAI-compatible chat completions endpoint
    Custom,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Custom => "custom",
        }
    }

    /// Model used when the configuration leaves it blank
    pub fn default_model(&self) -> Option<&'static str> {
        match self {
            ProviderKind::OpenAi => Some("gpt-4o-mini"),
            ProviderKind::Anthropic => Some("claude-3-5-haiku-latest"),
            ProviderKind::Gemini => Some("gemini-1.5-flash"),
            ProviderKind::Custom => None,
        }
    }

    /// Whether requests must carry an API key
    pub fn requires_key(&self) -> bool {
        !matches!(self, ProviderKind::Custom)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openai" | "open_ai" => Ok(ProviderKind::OpenAi),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "custom" => Ok(ProviderKind::Custom),
            other => Err(AiError::NotConfigured(format!("unknown provider '{}'", other))),
        }
    }
}

/// A single completion call
#[derive(Debug, Clone)]
pub struct CompletionRequest {
    pub provider: ProviderKind,
    pub model: String,
    pub api_key: String,
    /// Full endpoint for custom providers
    pub endpoint: Option<String>,
    pub system: String,
    pub prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Provider output
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub content: String,
}

/// Errors raised while generating a query with an AI provider
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AiError {
    #[error("Describe what you are looking for first")]
    EmptyPrompt,

    #[error("AI assistant is not configured: {0}")]
    NotConfigured(String),

    #[error("An AI request is already in progress")]
    Busy,

    #[error("Provider rejected the API key")]
    Unauthorized,

    #[error("Provider refused access to the model")]
    Forbidden,

    #[error("Provider rate limit reached")]
    RateLimited,

    #[error("AI request timed out")]
    Timeout,

    #[error("Provider returned HTTP {status}")]
    Http { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Unexpected provider response: {0}")]
    InvalidResponse(String),

    #[error("Provider returned an empty answer")]
    EmptyResponse,
}

impl AiError {
    /// Classify a non-2xx provider response
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        match status {
            401 => AiError::Unauthorized,
            403 => AiError::Forbidden,
            408 => AiError::Timeout,
            429 => AiError::RateLimited,
            _ => AiError::Http {
                status,
                body: body.into(),
            },
        }
    }

    /// HTTP-style status associated with the failure, when one exists
    pub fn status(&self) -> Option<u16> {
        match self {
            AiError::Unauthorized => Some(401),
            AiError::Forbidden => Some(403),
            AiError::Timeout => Some(408),
            AiError::RateLimited => Some(429),
            AiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Short notice suitable for showing to the user
    pub fn user_message(&self) -> String {
        match self {
            AiError::Unauthorized => "Invalid API key. Check your AI configuration.".to_string(),
            AiError::Forbidden => "Access denied. Check the permissions of your API key.".to_string(),
            AiError::RateLimited => "Rate limit reached. Slow down and try again shortly.".to_string(),
            AiError::Timeout => "The AI provider took too long. Please retry.".to_string(),
            AiError::NotConfigured(_) => {
                "Configure an AI provider and API key before generating queries.".to_string()
            }
            other => other.to_string(),
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout
        } else {
            AiError::Network(e.to_string())
        }
    }
}

/// Text-completion backend
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AiError>;
}
