//! HTTP completion provider
//!
//! Posts a chat-style request in the wire format of the configured provider
//! and extracts the first text answer.

use super::provider::{AiError, Completion, CompletionProvider, CompletionRequest, ProviderKind};
use crate::config::AiSettings;
use crate::network::HttpClient;
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, warn};

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Completion provider backed by the providers' public HTTP APIs
pub struct HttpCompletionProvider {
    http: HttpClient,
    openai_url: String,
    anthropic_url: String,
    gemini_url: String,
}

/// Everything needed to send one request
struct PreparedRequest {
    url: String,
    headers: Vec<(String, String)>,
    body: Value,
    content_pointer: &'static str,
}

impl HttpCompletionProvider {
    pub fn new(http: HttpClient, settings: &AiSettings) -> Self {
        Self {
            http,
            openai_url: settings.openai_url.trim_end_matches('/').to_string(),
            anthropic_url: settings.anthropic_url.trim_end_matches('/').to_string(),
            gemini_url: settings.gemini_url.trim_end_matches('/').to_string(),
        }
    }

    fn prepare(&self, request: &CompletionRequest) -> Result<PreparedRequest, AiError> {
        let prepared = match request.provider {
            ProviderKind::OpenAi => PreparedRequest {
                url: format!("{}/v1/chat/completions", self.openai_url),
                headers: bearer(&request.api_key),
                body: chat_body(request),
                content_pointer: "/choices/0/message/content",
            },
            ProviderKind::Custom => {
                let endpoint = request
                    .endpoint
                    .as_deref()
                    .ok_or_else(|| AiError::NotConfigured("missing endpoint".to_string()))?;
                PreparedRequest {
                    url: chat_completions_url(endpoint),
                    headers: bearer(&request.api_key),
                    body: chat_body(request),
                    content_pointer: "/choices/0/message/content",
                }
            }
            ProviderKind::Anthropic => PreparedRequest {
                url: format!("{}/v1/messages", self.anthropic_url),
                headers: vec![
                    ("x-api-key".to_string(), request.api_key.clone()),
                    ("anthropic-version".to_string(), ANTHROPIC_VERSION.to_string()),
                ],
                body: json!({
                    "model": request.model,
                    "max_tokens": request.max_tokens,
                    "temperature": request.temperature,
                    "system": request.system,
                    "messages": [{ "role": "user", "content": request.prompt }],
                }),
                content_pointer: "/content/0/text",
            },
            ProviderKind::Gemini => PreparedRequest {
                url: format!(
                    "{}/v1beta/models/{}:generateContent?key={}",
                    self.gemini_url,
                    urlencoding::encode(&request.model),
                    urlencoding::encode(&request.api_key)
                ),
                headers: Vec::new(),
                body: json!({
                    "systemInstruction": { "parts": [{ "text": request.system }] },
                    "contents": [{ "role": "user", "parts": [{ "text": request.prompt }] }],
                    "generationConfig": {
                        "maxOutputTokens": request.max_tokens,
                        "temperature": request.temperature,
                    },
                }),
                content_pointer: "/candidates/0/content/parts/0/text",
            },
        };
        Ok(prepared)
    }
}

#[async_trait]
impl CompletionProvider for HttpCompletionProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, AiError> {
        let prepared = self.prepare(request)?;
        let headers: Vec<(&str, &str)> = prepared
            .headers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();

        debug!("Requesting completion from {} ({})", request.provider, request.model);
        let response = self
            .http
            .post_json(&prepared.url, &headers, &prepared.body)
            .await
            .map_err(|e| {
                warn!("{} request failed: {}", request.provider, e);
                AiError::from(e)
            })?;

        if !response.is_success() {
            warn!("{} returned HTTP {}", request.provider, response.status);
            return Err(AiError::from_status(response.status, response.text));
        }

        let value: Value = response
            .json()
            .map_err(|e| AiError::InvalidResponse(e.to_string()))?;
        let content = value
            .pointer(prepared.content_pointer)
            .and_then(Value::as_str)
            .ok_or_else(|| {
                AiError::InvalidResponse(format!("no text at {}", prepared.content_pointer))
            })?;

        Ok(Completion {
            content: content.to_string(),
        })
    }
}

fn chat_body(request: &CompletionRequest) -> Value {
    json!({
        "model": request.model,
        "max_tokens": request.max_tokens,
        "temperature": request.temperature,
        "messages": [
            { "role": "system", "content": request.system },
            { "role": "user", "content": request.prompt },
        ],
    })
}

fn bearer(api_key: &str) -> Vec<(String, String)> {
    if api_key.is_empty() {
        Vec::new()
    } else {
        vec![("Authorization".to_string(), format!("Bearer {}", api_key))]
    }
}

/// Accepts either a base URL (`http://host/v1`) or the full chat path.
fn chat_completions_url(endpoint: &str) -> String {
    let endpoint = endpoint.trim_end_matches('/');
    if endpoint.ends_with("/chat/completions") {
        endpoint.to_string()
    } else {
        format!("{}/chat/completions", endpoint)
    }
}
