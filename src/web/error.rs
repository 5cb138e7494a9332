//! API error responses

use crate::ai::AiError;
use crate::engines::EngineError;
use crate::presets::PresetError;
use crate::session::SessionError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Error returned by handlers as `{ "error": code, "message": text }`
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "bad_request", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::warn!("{} ({}): {}", self.code, self.status, self.message);
        }
        (
            self.status,
            Json(json!({ "error": self.code, "message": self.message })),
        )
            .into_response()
    }
}

impl From<PresetError> for ApiError {
    fn from(e: PresetError) -> Self {
        let (status, code) = match e {
            PresetError::NotFound(_) => (StatusCode::NOT_FOUND, "preset_not_found"),
            PresetError::BuiltinProtected(_) => (StatusCode::FORBIDDEN, "builtin_protected"),
            PresetError::InvalidDocument(_) => (StatusCode::BAD_REQUEST, "invalid_document"),
        };
        Self::new(status, code, e.to_string())
    }
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "unsupported_engine", e.to_string())
    }
}

impl From<SessionError> for ApiError {
    fn from(e: SessionError) -> Self {
        match e {
            SessionError::EmptyQuery => Self::new(
                StatusCode::UNPROCESSABLE_ENTITY,
                "empty_query",
                "Add some search terms or filters first",
            ),
            SessionError::HistoryNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, "history_not_found", e.to_string())
            }
            SessionError::InvalidDocument(_) => {
                Self::new(StatusCode::BAD_REQUEST, "invalid_document", e.to_string())
            }
            SessionError::Preset(e) => e.into(),
        }
    }
}

impl From<AiError> for ApiError {
    fn from(e: AiError) -> Self {
        let (status, code) = match e {
            AiError::EmptyPrompt => (StatusCode::UNPROCESSABLE_ENTITY, "empty_prompt"),
            AiError::NotConfigured(_) => (StatusCode::PRECONDITION_FAILED, "ai_not_configured"),
            AiError::Busy => (StatusCode::CONFLICT, "ai_busy"),
            AiError::Unauthorized => (StatusCode::UNAUTHORIZED, "ai_unauthorized"),
            AiError::Forbidden => (StatusCode::FORBIDDEN, "ai_forbidden"),
            AiError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "ai_rate_limited"),
            AiError::Timeout => (StatusCode::GATEWAY_TIMEOUT, "ai_timeout"),
            AiError::Http { .. }
            | AiError::Network(_)
            | AiError::InvalidResponse(_)
            | AiError::EmptyResponse => (StatusCode::BAD_GATEWAY, "ai_provider_error"),
        };
        Self::new(status, code, e.user_message())
    }
}
