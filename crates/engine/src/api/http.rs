//! HTTP routes.

use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;

use crate::app::App;
use crate::infrastructure::fallback::AllBackendsExhausted;
use crate::infrastructure::srd::{SrdCategory, SrdError};
use crate::use_cases::narration::ChatCommand;
use dmforge_domain::{Character, ChatTurn, Encounter, GameSession, Party};

const DEFAULT_RANDOM_MONSTER_COUNT: usize = 3;
const MAX_RANDOM_MONSTER_COUNT: usize = 10;

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/api/chat", post(chat_with_dm))
        .route("/api/random-encounter", post(generate_random_encounter))
        .route("/api/spells", get(list_spells))
        .route("/api/spells/{index}", get(get_spell))
        .route("/api/monsters", get(list_monsters))
        .route("/api/monsters/random", get(random_monsters))
        .route("/api/monsters/{index}", get(get_monster))
        .route("/api/classes", get(list_classes))
        .route("/api/classes/{index}", get(get_class))
        .route("/api/races", get(list_races))
        .route("/api/races/{index}", get(get_race))
        .route("/api/equipment", get(list_equipment))
        .route("/api/equipment/{index}", get(get_equipment))
        .route("/api/search/{category}", get(search_category))
}

async fn root() -> Json<serde_json::Value> {
    Json(json!({ "message": "DM Forge engine is running" }))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "healthy" }))
}

// =============================================================================
// Narration
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub character: Option<Character>,
    #[serde(default)]
    pub game_session: Option<GameSession>,
    #[serde(default)]
    pub chat_history: Vec<ChatTurn>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub message: String,
    pub suggestions: Vec<String>,
}

async fn chat_with_dm(
    State(app): State<Arc<App>>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let outcome = app
        .use_cases
        .narration
        .chat
        .execute(ChatCommand {
            message: request.message,
            character: request.character,
            session: request.game_session,
            history: request.chat_history,
        })
        .await?;

    Ok(Json(ChatResponse {
        message: outcome.message,
        suggestions: outcome.suggestions,
    }))
}

#[derive(Debug, Deserialize)]
pub struct EncounterRequest {
    pub party_level: u32,
    pub party_size: u32,
}

async fn generate_random_encounter(
    State(app): State<Arc<App>>,
    Json(request): Json<EncounterRequest>,
) -> Result<Json<Encounter>, ApiError> {
    let party = Party::new(request.party_level, request.party_size)
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let encounter = app.use_cases.narration.encounter.execute(party).await?;
    Ok(Json(encounter))
}

// =============================================================================
// SRD reference proxy
// =============================================================================

async fn list_category(
    app: &App,
    category: SrdCategory,
) -> Result<Json<serde_json::Value>, ApiError> {
    let results = app.srd.list(category).await?;
    Ok(Json(json!({ "results": results })))
}

async fn get_resource(
    app: &App,
    category: SrdCategory,
    index: &str,
) -> Result<Json<serde_json::Value>, ApiError> {
    Ok(Json(app.srd.get(category, index).await?))
}

async fn list_spells(State(app): State<Arc<App>>) -> Result<Json<serde_json::Value>, ApiError> {
    list_category(&app, SrdCategory::Spells).await
}

async fn get_spell(
    State(app): State<Arc<App>>,
    Path(index): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    get_resource(&app, SrdCategory::Spells, &index).await
}

async fn list_monsters(State(app): State<Arc<App>>) -> Result<Json<serde_json::Value>, ApiError> {
    list_category(&app, SrdCategory::Monsters).await
}

async fn get_monster(
    State(app): State<Arc<App>>,
    Path(index): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    get_resource(&app, SrdCategory::Monsters, &index).await
}

async fn list_classes(State(app): State<Arc<App>>) -> Result<Json<serde_json::Value>, ApiError> {
    list_category(&app, SrdCategory::Classes).await
}

async fn get_class(
    State(app): State<Arc<App>>,
    Path(index): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    get_resource(&app, SrdCategory::Classes, &index).await
}

async fn list_races(State(app): State<Arc<App>>) -> Result<Json<serde_json::Value>, ApiError> {
    list_category(&app, SrdCategory::Races).await
}

async fn get_race(
    State(app): State<Arc<App>>,
    Path(index): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    get_resource(&app, SrdCategory::Races, &index).await
}

async fn list_equipment(State(app): State<Arc<App>>) -> Result<Json<serde_json::Value>, ApiError> {
    list_category(&app, SrdCategory::Equipment).await
}

async fn get_equipment(
    State(app): State<Arc<App>>,
    Path(index): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    get_resource(&app, SrdCategory::Equipment, &index).await
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub name: String,
}

async fn search_category(
    State(app): State<Arc<App>>,
    Path(category): Path<String>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let category = SrdCategory::parse(&category)
        .ok_or_else(|| ApiError::BadRequest(format!("unknown category: {category}")))?;

    let found = app.srd.search_by_name(category, &query.name).await?;
    match found {
        Some(resource) => Ok(Json(serde_json::to_value(resource).unwrap_or_default())),
        None => Err(ApiError::NotFound),
    }
}

#[derive(Debug, Deserialize)]
pub struct RandomMonstersQuery {
    pub challenge_rating: Option<f64>,
    pub count: Option<usize>,
}

async fn random_monsters(
    State(app): State<Arc<App>>,
    Query(query): Query<RandomMonstersQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let count = query
        .count
        .unwrap_or(DEFAULT_RANDOM_MONSTER_COUNT)
        .clamp(1, MAX_RANDOM_MONSTER_COUNT);

    let monsters = app
        .srd
        .random_monsters(query.challenge_rating, count)
        .await?;
    Ok(Json(json!({ "results": monsters })))
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug)]
pub enum ApiError {
    NotFound,
    BadRequest(String),
    UpstreamUnavailable(String),
    Internal(String),
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::NotFound => {
                (axum::http::StatusCode::NOT_FOUND, "Not found").into_response()
            }
            ApiError::BadRequest(msg) => {
                (axum::http::StatusCode::BAD_REQUEST, msg).into_response()
            }
            ApiError::UpstreamUnavailable(msg) => {
                (axum::http::StatusCode::BAD_GATEWAY, msg).into_response()
            }
            ApiError::Internal(_) => (
                axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                "Internal error",
            )
                .into_response(),
        }
    }
}

impl From<AllBackendsExhausted> for ApiError {
    fn from(e: AllBackendsExhausted) -> Self {
        ApiError::UpstreamUnavailable(e.to_string())
    }
}

impl From<SrdError> for ApiError {
    fn from(e: SrdError) -> Self {
        match e {
            SrdError::Status(404) => ApiError::NotFound,
            other => ApiError::UpstreamUnavailable(other.to_string()),
        }
    }
}
