use crate::config::Config;
use crate::error::OddsError;
use crate::models::Snapshot;
use crate::utils::odds_math::{
    american_odds_to_probability, combine_parlay, parse_legs, payout, round_pct, OddsValue,
    Payout,
};
use crate::utils::pick_parser::{parse_pick_text, parse_prop_line, ParsedPicks};
use crate::utils::pick_ranker::{prop_leaderboard, top_picks};
use crate::{build_dashboard, collect_picks, PropPick};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

// Shared state to cache the feed snapshot
pub type SharedData = Arc<RwLock<Option<Snapshot>>>;

#[derive(Clone)]
pub struct AppState {
    pub data: SharedData,
    pub top_picks: usize,
    pub leaderboard_size: usize,
}

impl AppState {
    pub fn new(snapshot: Option<Snapshot>, config: &Config) -> Self {
        Self {
            data: Arc::new(RwLock::new(snapshot)),
            top_picks: config.top_picks,
            leaderboard_size: config.leaderboard_size,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Odds(#[from] OddsError),

    #[error("Data not loaded yet")]
    NotLoaded,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Odds(_) => StatusCode::BAD_REQUEST,
            ApiError::NotLoaded => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

async fn snapshot(state: &AppState) -> Result<Snapshot, ApiError> {
    state.data.read().await.clone().ok_or(ApiError::NotLoaded)
}

/// Stakes come from a text box: numbers or numeric strings are accepted,
/// anything else means "no payout".
fn stake_value(stake: Option<&Value>) -> Option<f64> {
    match stake? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let loaded = state.data.read().await.is_some();
    Json(json!({ "status": "ok", "has_snapshot": loaded }))
}

async fn games(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = snapshot(&state).await?;
    Ok(Json(json!({ "games": snapshot.games })))
}

async fn props(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = snapshot(&state).await?;
    Ok(Json(json!({ "props": snapshot.props })))
}

async fn standings(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = snapshot(&state).await?;
    Ok(Json(json!({ "standings": snapshot.standings })))
}

async fn dashboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = snapshot(&state).await?;
    Ok(Json(build_dashboard(
        &snapshot,
        state.top_picks,
        state.leaderboard_size,
    )))
}

async fn top_picks_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = snapshot(&state).await?;
    let picks = collect_picks(&snapshot);
    Ok(Json(json!({ "picks": top_picks(&snapshot.games, &picks, state.top_picks) })))
}

async fn props_leaderboard(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let snapshot = snapshot(&state).await?;
    Ok(Json(json!({
        "props": prop_leaderboard(&snapshot.props, state.leaderboard_size)
    })))
}

#[derive(Debug, Deserialize)]
pub struct PayoutRequest {
    pub odds: String,
    pub stake: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct PayoutResponse {
    pub odds: OddsValue,
    pub decimal: f64,
    /// Implied probability in percent
    pub implied_probability: f64,
    pub payout: Option<Payout>,
}

async fn payout_handler(Json(req): Json<PayoutRequest>) -> Result<impl IntoResponse, ApiError> {
    let odds: OddsValue = req.odds.parse()?;
    Ok(Json(PayoutResponse {
        odds,
        decimal: odds.to_decimal(),
        implied_probability: round_pct(american_odds_to_probability(odds) * 100.0),
        payout: stake_value(req.stake.as_ref()).and_then(|stake| payout(odds, stake)),
    }))
}

#[derive(Debug, Deserialize)]
pub struct ParlayRequest {
    pub legs: Vec<String>,
    pub stake: Option<Value>,
}

async fn parlay(Json(req): Json<ParlayRequest>) -> Result<impl IntoResponse, ApiError> {
    let legs = parse_legs(&req.legs)?;
    let mut quote = combine_parlay(&legs)?;
    if let Some(stake) = stake_value(req.stake.as_ref()) {
        quote = quote.with_stake(stake);
    }
    Ok(Json(quote))
}

#[derive(Debug, Deserialize)]
pub struct ParseRequest {
    pub text: String,
}

#[derive(Debug, Serialize)]
pub struct ParseResponse {
    pub picks: ParsedPicks,
    /// Structured props found in the player-prop segment, one per line
    pub props: Vec<PropPick>,
}

async fn parse(Json(req): Json<ParseRequest>) -> impl IntoResponse {
    let picks = parse_pick_text(&req.text);
    let props = picks
        .player_prop
        .as_deref()
        .map(|text| text.lines().filter_map(parse_prop_line).collect())
        .unwrap_or_default();
    Json(ParseResponse { picks, props })
}

/// Build the JSON API router
pub fn router(state: AppState) -> Router {
    Router::new()
        // This will serve files from the "static" directory at the "/static" URL path
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", get(health))
        .route("/api/games", get(games))
        .route("/api/props", get(props))
        .route("/api/props/leaderboard", get(props_leaderboard))
        .route("/api/standings", get(standings))
        .route("/api/dashboard", get(dashboard))
        .route("/api/top-picks", get(top_picks_handler))
        .route("/api/payout", post(payout_handler))
        .route("/api/parlay", post(parlay))
        .route("/api/parse", post(parse))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
