//! HTTP request handlers

use super::error::ApiError;
use super::state::AppState;
use crate::ai::{AiConfig, AiConfigView, ProviderKind};
use crate::engines::SearchEngine;
use crate::history::{DateRange, HistoryEntry, HistoryFilter, HistoryStats, SortMode};
use crate::presets::{Preset, Shortcut};
use crate::query::{AdvancedSearch, Dimension, SearchSpecification};
use crate::session::{Preferences, PreferencesUpdate, SearchLaunch, Session};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Current specification with its compiled preview
#[derive(Debug, Serialize)]
pub struct SpecView {
    pub specification: SearchSpecification,
    pub compiled: String,
}

impl From<&Session> for SpecView {
    fn from(session: &Session) -> Self {
        Self {
            specification: session.specification().clone(),
            compiled: session.compiled(),
        }
    }
}

fn parse_dimension(raw: &str) -> Result<Dimension, ApiError> {
    raw.parse().map_err(ApiError::bad_request)
}

fn parse_engine(raw: Option<&str>) -> Result<Option<SearchEngine>, ApiError> {
    raw.filter(|e| !e.trim().is_empty())
        .map(|e| e.parse::<SearchEngine>())
        .transpose()
        .map_err(ApiError::from)
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "instance": state.instance_name(),
        "version": crate::VERSION
    }))
}

// Specification

pub async fn get_spec(State(state): State<AppState>) -> Json<SpecView> {
    let session = state.session.lock().await;
    Json(SpecView::from(&*session))
}

pub async fn clear_spec(State(state): State<AppState>) -> Json<SpecView> {
    let mut session = state.session.lock().await;
    session.clear_specification();
    Json(SpecView::from(&*session))
}

#[derive(Debug, Deserialize)]
pub struct TextBody {
    #[serde(default)]
    pub text: String,
}

pub async fn set_free_text(
    State(state): State<AppState>,
    Json(body): Json<TextBody>,
) -> Json<SpecView> {
    let mut session = state.session.lock().await;
    session.set_free_text(&body.text);
    Json(SpecView::from(&*session))
}

pub async fn apply_advanced(
    State(state): State<AppState>,
    Json(body): Json<AdvancedSearch>,
) -> Json<SpecView> {
    let mut session = state.session.lock().await;
    session.apply_advanced(&body);
    Json(SpecView::from(&*session))
}

pub async fn add_tag(
    State(state): State<AppState>,
    Path(dimension): Path<String>,
    Json(body): Json<TextBody>,
) -> ApiResult<SpecView> {
    let dimension = parse_dimension(&dimension)?;
    let mut session = state.session.lock().await;
    session.add_tag(dimension, &body.text);
    Ok(Json(SpecView::from(&*session)))
}

pub async fn clear_tags(
    State(state): State<AppState>,
    Path(dimension): Path<String>,
) -> ApiResult<SpecView> {
    let dimension = parse_dimension(&dimension)?;
    let mut session = state.session.lock().await;
    session.clear_dimension(dimension);
    Ok(Json(SpecView::from(&*session)))
}

pub async fn remove_tag(
    State(state): State<AppState>,
    Path((dimension, id)): Path<(String, String)>,
) -> ApiResult<SpecView> {
    let dimension = parse_dimension(&dimension)?;
    let mut session = state.session.lock().await;
    session.remove_tag(dimension, &id);
    Ok(Json(SpecView::from(&*session)))
}

pub async fn compile(State(state): State<AppState>) -> impl IntoResponse {
    let session = state.session.lock().await;
    Json(json!({ "compiled": session.compiled() }))
}

// Search

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    pub engine: Option<String>,
}

pub async fn search(
    State(state): State<AppState>,
    body: Option<Json<SearchParams>>,
) -> ApiResult<SearchLaunch> {
    let params = body.map(|Json(p)| p).unwrap_or_default();
    let engine = parse_engine(params.engine.as_deref())?;
    let mut session = state.session.lock().await;
    Ok(Json(session.search(engine)?))
}

/// Search and redirect straight to the engine
pub async fn search_redirect(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let engine = parse_engine(params.engine.as_deref())?;
    let mut session = state.session.lock().await;
    let launch = session.search(engine)?;
    Ok(Redirect::to(&launch.url).into_response())
}

// Presets and shortcuts

pub async fn list_presets(State(state): State<AppState>) -> Json<Vec<Preset>> {
    let session = state.session.lock().await;
    Json(session.library().list().cloned().collect())
}

#[derive(Debug, Default, Deserialize)]
pub struct SavePresetBody {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn save_preset(
    State(state): State<AppState>,
    Json(body): Json<SavePresetBody>,
) -> impl IntoResponse {
    let mut session = state.session.lock().await;
    let preset = session.save_preset(body.name, body.description);
    (StatusCode::CREATED, Json(preset))
}

pub async fn apply_preset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SpecView> {
    let mut session = state.session.lock().await;
    session.apply_preset(&id)?;
    Ok(Json(SpecView::from(&*session)))
}

pub async fn toggle_preset_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<serde_json::Value> {
    let mut session = state.session.lock().await;
    let favorite = session.toggle_preset_favorite(&id)?;
    Ok(Json(json!({ "id": id, "isFavorite": favorite })))
}

pub async fn delete_preset(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Preset> {
    let mut session = state.session.lock().await;
    Ok(Json(session.delete_preset(&id)?))
}

pub async fn export_presets(State(state): State<AppState>) -> Result<Response, ApiError> {
    let session = state.session.lock().await;
    let document = session.export_presets()?;
    Ok(json_document(document))
}

pub async fn import_presets(State(state): State<AppState>, body: String) -> ApiResult<serde_json::Value> {
    let mut session = state.session.lock().await;
    let imported = session.import_presets(&body)?;
    Ok(Json(json!({ "imported": imported })))
}

pub async fn list_shortcuts(State(state): State<AppState>) -> Json<Vec<Shortcut>> {
    let session = state.session.lock().await;
    Json(session.library().shortcuts().to_vec())
}

pub async fn apply_shortcut(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SpecView> {
    let mut session = state.session.lock().await;
    session.apply_shortcut(&id)?;
    Ok(Json(SpecView::from(&*session)))
}

// History

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub text: Option<String>,
    pub category: Option<String>,
    pub engine: Option<SearchEngine>,
    #[serde(default)]
    pub favorites_only: bool,
    #[serde(default)]
    pub range: DateRange,
    #[serde(default)]
    pub sort: SortMode,
}

pub async fn list_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<Vec<HistoryEntry>> {
    let filter = HistoryFilter {
        text: params.text,
        category: params.category,
        engine: params.engine,
        favorites_only: params.favorites_only,
        range: params.range,
    };
    let session = state.session.lock().await;
    let entries = session
        .history()
        .query(&filter, params.sort, chrono::Utc::now())
        .into_iter()
        .cloned()
        .collect();
    Json(entries)
}

#[derive(Debug, Serialize)]
pub struct HistoryStatsView {
    #[serde(flatten)]
    pub stats: HistoryStats,
    pub categories: Vec<String>,
}

pub async fn history_stats(State(state): State<AppState>) -> Json<HistoryStatsView> {
    let session = state.session.lock().await;
    Json(HistoryStatsView {
        stats: session.history().stats(),
        categories: session.history().categories(),
    })
}

pub async fn load_history_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<SpecView> {
    let mut session = state.session.lock().await;
    session.load_history_entry(&id)?;
    Ok(Json(SpecView::from(&*session)))
}

pub async fn toggle_history_favorite(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<serde_json::Value> {
    let mut session = state.session.lock().await;
    let favorite = session.toggle_history_favorite(&id)?;
    Ok(Json(json!({ "id": id, "isFavorite": favorite })))
}

#[derive(Debug, Deserialize)]
pub struct CategoryBody {
    #[serde(default)]
    pub category: String,
}

pub async fn set_history_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<CategoryBody>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.session.lock().await;
    session.set_history_category(&id, &body.category)?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Deserialize)]
pub struct NotesBody {
    #[serde(default)]
    pub notes: String,
}

pub async fn set_history_notes(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<NotesBody>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.session.lock().await;
    session.set_history_notes(&id, &body.notes)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_history_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let mut session = state.session.lock().await;
    session.delete_history_entry(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn clear_history(State(state): State<AppState>) -> StatusCode {
    state.session.lock().await.clear_history();
    StatusCode::NO_CONTENT
}

pub async fn export_history(State(state): State<AppState>) -> Result<Response, ApiError> {
    let session = state.session.lock().await;
    let document = session.export_history()?;
    Ok(json_document(document))
}

pub async fn import_history(State(state): State<AppState>, body: String) -> ApiResult<serde_json::Value> {
    let mut session = state.session.lock().await;
    let imported = session.import_history(&body)?;
    Ok(Json(json!({ "imported": imported })))
}

// Recent terms and preferences

pub async fn recent_terms(State(state): State<AppState>) -> Json<Vec<String>> {
    let session = state.session.lock().await;
    Json(session.recent_terms().to_vec())
}

pub async fn clear_recent_terms(State(state): State<AppState>) -> StatusCode {
    state.session.lock().await.clear_recent_terms();
    StatusCode::NO_CONTENT
}

pub async fn get_preferences(State(state): State<AppState>) -> Json<Preferences> {
    let session = state.session.lock().await;
    Json(session.preferences().clone())
}

pub async fn update_preferences(
    State(state): State<AppState>,
    Json(update): Json<PreferencesUpdate>,
) -> Json<Preferences> {
    let mut session = state.session.lock().await;
    Json(session.update_preferences(update).clone())
}

// AI assistant

pub async fn get_ai_config(State(state): State<AppState>) -> Json<AiConfigView> {
    let session = state.session.lock().await;
    Json(session.ai_config().view())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConfigBody {
    pub provider: ProviderKind,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub api_key: String,
    pub endpoint: Option<String>,
}

pub async fn set_ai_config(
    State(state): State<AppState>,
    Json(body): Json<AiConfigBody>,
) -> ApiResult<AiConfigView> {
    let config = AiConfig::new(body.provider, &body.model, &body.api_key, body.endpoint.as_deref())?;
    let mut session = state.session.lock().await;
    session.set_ai_config(config);
    Ok(Json(session.ai_config().view()))
}

pub async fn clear_ai_config(State(state): State<AppState>) -> Json<AiConfigView> {
    let mut session = state.session.lock().await;
    session.clear_ai_config();
    Json(session.ai_config().view())
}

#[derive(Debug, Deserialize)]
pub struct GenerateBody {
    #[serde(default)]
    pub prompt: String,
    /// Put the generated query into the free text
    #[serde(default = "default_apply")]
    pub apply: bool,
}

fn default_apply() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct GenerateView {
    pub query: String,
    #[serde(flatten)]
    pub spec: SpecView,
}

/// Generate a query; the session lock is not held while the provider runs
pub async fn generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateBody>,
) -> ApiResult<GenerateView> {
    let config = state.session.lock().await.ai_config().clone();
    let query = state.assistant.generate(&body.prompt, &config).await?;

    let mut session = state.session.lock().await;
    if body.apply {
        session.apply_generated_text(&query);
    }
    Ok(Json(GenerateView {
        query,
        spec: SpecView::from(&*session),
    }))
}

fn json_document(document: String) -> Response {
    ([(header::CONTENT_TYPE, "application/json")], document).into_response()
}
