//! Route definitions

use super::handlers;
use super::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/search", get(handlers::search_redirect))
        // Specification editing
        .route("/api/spec", get(handlers::get_spec).delete(handlers::clear_spec))
        .route("/api/spec/free-text", put(handlers::set_free_text))
        .route("/api/spec/advanced", put(handlers::apply_advanced))
        .route(
            "/api/spec/tags/:dimension",
            post(handlers::add_tag).delete(handlers::clear_tags),
        )
        .route("/api/spec/tags/:dimension/:id", delete(handlers::remove_tag))
        .route("/api/compile", get(handlers::compile))
        .route("/api/search", post(handlers::search))
        // Presets and shortcuts
        .route(
            "/api/presets",
            get(handlers::list_presets).post(handlers::save_preset),
        )
        .route("/api/presets/export", get(handlers::export_presets))
        .route("/api/presets/import", post(handlers::import_presets))
        .route("/api/presets/:id", delete(handlers::delete_preset))
        .route("/api/presets/:id/apply", post(handlers::apply_preset))
        .route("/api/presets/:id/favorite", post(handlers::toggle_preset_favorite))
        .route("/api/shortcuts", get(handlers::list_shortcuts))
        .route("/api/shortcuts/:id/apply", post(handlers::apply_shortcut))
        // History
        .route(
            "/api/history",
            get(handlers::list_history).delete(handlers::clear_history),
        )
        .route("/api/history/stats", get(handlers::history_stats))
        .route("/api/history/export", get(handlers::export_history))
        .route("/api/history/import", post(handlers::import_history))
        .route("/api/history/:id", delete(handlers::delete_history_entry))
        .route("/api/history/:id/load", post(handlers::load_history_entry))
        .route("/api/history/:id/favorite", post(handlers::toggle_history_favorite))
        .route("/api/history/:id/category", put(handlers::set_history_category))
        .route("/api/history/:id/notes", put(handlers::set_history_notes))
        // Recent terms and preferences
        .route(
            "/api/terms",
            get(handlers::recent_terms).delete(handlers::clear_recent_terms),
        )
        .route(
            "/api/preferences",
            get(handlers::get_preferences).put(handlers::update_preferences),
        )
        // AI assistant
        .route(
            "/api/ai/config",
            get(handlers::get_ai_config)
                .put(handlers::set_ai_config)
                .delete(handlers::clear_ai_config),
        )
        .route("/api/ai/generate", post(handlers::generate))
        // Add middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        // Add state
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{AiAssistant, AiError, Completion, CompletionProvider, CompletionRequest};
    use crate::config::Settings;
    use crate::session::Session;
    use crate::storage::MemoryStore;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    struct FixedProvider(&'static str);

    #[async_trait]
    impl CompletionProvider for FixedProvider {
        async fn complete(&self, _request: &CompletionRequest) -> Result<Completion, AiError> {
            Ok(Completion {
                content: self.0.to_string(),
            })
        }
    }

    fn app() -> Router {
        let settings = Settings::default();
        let session = Session::load(Box::new(MemoryStore::new()), &settings);
        let assistant = AiAssistant::new(
            Arc::new(FixedProvider("```\nsite:gov filetype:pdf budget\n```")),
            &settings.ai,
        );
        create_router(AppState::new(settings, session, assistant))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["instance"], "Dorksmith");
    }

    #[tokio::test]
    async fn test_edit_and_compile() {
        let app = app();
        send(&app, Method::PUT, "/api/spec/free-text", Some(json!({ "text": "budget" }))).await;
        send(&app, Method::POST, "/api/spec/tags/sites", Some(json!({ "text": "a.gov" }))).await;
        let (_, body) =
            send(&app, Method::POST, "/api/spec/tags/excludeWords", Some(json!({ "text": "draft" }))).await;
        assert_eq!(body["compiled"], "budget (site:a.gov) -\"draft\"");

        let id = body["specification"]["sites"][0]["id"].as_str().unwrap().to_string();
        let (_, body) = send(&app, Method::DELETE, &format!("/api/spec/tags/sites/{}", id), None).await;
        assert_eq!(body["compiled"], "budget -\"draft\"");

        let (_, body) = send(&app, Method::GET, "/api/compile", None).await;
        assert_eq!(body["compiled"], "budget -\"draft\"");
    }

    #[tokio::test]
    async fn test_unknown_dimension_is_bad_request() {
        let (status, body) =
            send(&app(), Method::POST, "/api/spec/tags/colors", Some(json!({ "text": "x" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_empty_search_is_unprocessable() {
        let app = app();
        let (status, body) = send(&app, Method::POST, "/api/search", Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "empty_query");

        let (_, history) = send(&app, Method::GET, "/api/history", None).await;
        assert_eq!(history, json!([]));
    }

    #[tokio::test]
    async fn test_search_records_history() {
        let app = app();
        send(&app, Method::PUT, "/api/spec/free-text", Some(json!({ "text": "rust" }))).await;
        let (status, body) =
            send(&app, Method::POST, "/api/search", Some(json!({ "engine": "ddg" }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["url"], "https://duckduckgo.com/?q=rust");
        assert_eq!(body["engine"], "duckduckgo");

        let (_, history) = send(&app, Method::GET, "/api/history?engine=duckduckgo", None).await;
        assert_eq!(history.as_array().unwrap().len(), 1);
        let (_, terms) = send(&app, Method::GET, "/api/terms", None).await;
        assert_eq!(terms, json!(["rust"]));
    }

    #[tokio::test]
    async fn test_unsupported_engine_fails_loudly() {
        let app = app();
        send(&app, Method::PUT, "/api/spec/free-text", Some(json!({ "text": "rust" }))).await;
        let (status, body) =
            send(&app, Method::POST, "/api/search", Some(json!({ "engine": "altavista" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "unsupported_engine");
    }

    #[tokio::test]
    async fn test_search_redirect() {
        let app = app();
        send(&app, Method::PUT, "/api/spec/free-text", Some(json!({ "text": "rust lang" }))).await;
        let response = app
            .clone()
            .oneshot(Request::get("/search?engine=google").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert!(response.status().is_redirection());
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://www.google.com/search?q=rust%20lang"
        );
    }

    #[tokio::test]
    async fn test_builtin_preset_delete_is_forbidden() {
        let (status, body) =
            send(&app(), Method::DELETE, "/api/presets/builtin-documents", None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["error"], "builtin_protected");
    }

    #[tokio::test]
    async fn test_preset_save_export_import() {
        let app = app();
        send(&app, Method::POST, "/api/spec/tags/fileTypes", Some(json!({ "text": "pdf" }))).await;
        let (status, preset) =
            send(&app, Method::POST, "/api/presets", Some(json!({ "name": "Mine" }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(preset["name"], "Mine");

        let (_, exported) = send(&app, Method::GET, "/api/presets/export", None).await;
        assert_eq!(exported.as_array().unwrap().len(), 1);

        let (status, body) = send(&app, Method::POST, "/api/presets/import", Some(exported)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["imported"], 1);

        let (status, _) =
            send(&app, Method::POST, "/api/presets/import", Some(json!({ "not": "array" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_apply_shortcut_is_additive() {
        let app = app();
        send(&app, Method::POST, "/api/spec/tags/sites", Some(json!({ "text": "a.com" }))).await;
        let (status, body) = send(&app, Method::POST, "/api/shortcuts/shortcut-pdf/apply", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["compiled"], "(site:a.com) (filetype:pdf)");

        let (status, _) = send(&app, Method::POST, "/api/shortcuts/missing/apply", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_generate_requires_configuration() {
        let app = app();
        let (status, body) =
            send(&app, Method::POST, "/api/ai/generate", Some(json!({ "prompt": "pdfs" }))).await;
        assert_eq!(status, StatusCode::PRECONDITION_FAILED);
        assert_eq!(body["error"], "ai_not_configured");

        send(
            &app,
            Method::PUT,
            "/api/ai/config",
            Some(json!({ "provider": "openai", "apiKey": "sk-1234567890" })),
        )
        .await;

        let (status, body) =
            send(&app, Method::POST, "/api/ai/generate", Some(json!({ "prompt": "  " }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "empty_prompt");
    }

    #[tokio::test]
    async fn test_generate_applies_free_text() {
        let app = app();
        let (_, config) = send(
            &app,
            Method::PUT,
            "/api/ai/config",
            Some(json!({ "provider": "openai", "apiKey": "sk-1234567890" })),
        )
        .await;
        assert_eq!(config["apiKey"], "sk-****7890");
        assert!(config["disclaimer"].as_str().unwrap().contains("not secure"));

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/ai/generate",
            Some(json!({ "prompt": "government budget pdfs" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["query"], "site:gov filetype:pdf budget");
        assert_eq!(body["specification"]["freeText"], "site:gov filetype:pdf budget");
        assert_eq!(body["specification"]["sites"], json!([]));
    }

    #[tokio::test]
    async fn test_preferences_update() {
        let app = app();
        let (_, prefs) = send(
            &app,
            Method::PUT,
            "/api/preferences",
            Some(json!({ "theme": "dark", "toggles": { "compact": true } })),
        )
        .await;
        assert_eq!(prefs["theme"], "dark");
        assert_eq!(prefs["toggles"]["compact"], true);
        assert_eq!(prefs["lastEngine"], "google");
    }
}
