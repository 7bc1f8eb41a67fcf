use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use cache::{CachedSetup, RefreshOutcome};
use common::{Error, Signal};

use crate::AppState;

pub fn setups_router() -> Router<AppState> {
    Router::new()
        .route("/api/setups", get(list_setups))
        .route("/api/setups/:symbol", get(get_setup))
        .route("/api/setups/:symbol/refresh", post(refresh_setup))
        .route("/api/best-setups", get(best_setups))
}

// ─── Listing ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct ListQuery {
    signal: Option<Signal>,
    min_score: Option<f64>,
    limit: Option<usize>,
}

async fn list_setups(State(state): State<AppState>, Query(q): Query<ListQuery>) -> Json<Value> {
    let limit = q.limit.unwrap_or(100).min(500);
    let setups = filter_setups(
        state.refresher.cache().all().await,
        q.signal,
        q.min_score,
        limit,
    );
    Json(json!({ "count": setups.len(), "setups": setups }))
}

/// Cache output is already sorted by score descending; filters preserve it.
fn filter_setups(
    setups: Vec<CachedSetup>,
    signal: Option<Signal>,
    min_score: Option<f64>,
    limit: usize,
) -> Vec<CachedSetup> {
    setups
        .into_iter()
        .filter(|c| signal.map_or(true, |s| c.setup.signal == s))
        .filter(|c| min_score.map_or(true, |m| c.setup.overall_score >= m))
        .take(limit)
        .collect()
}

// ─── Single symbol ────────────────────────────────────────────────────────────

async fn get_setup(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if let Some(cached) = state.refresher.cache().get(&symbol).await {
        return Ok(Json(json!(cached)));
    }

    if state.refresher.symbols().iter().any(|s| *s == symbol) {
        // On the watchlist but no successful refresh yet
        Err((
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": Error::NotAvailable { symbol }.to_string() })),
        ))
    } else {
        Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown symbol '{symbol}'") })),
        ))
    }
}

async fn refresh_setup(
    State(state): State<AppState>,
    Path(symbol): Path<String>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !state.refresher.symbols().iter().any(|s| *s == symbol) {
        return Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("unknown symbol '{symbol}'") })),
        ));
    }

    info!(symbol, "manual refresh requested");
    match state.refresher.refresh_symbol(&symbol).await {
        RefreshOutcome::Refreshed(cached) | RefreshOutcome::Joined(cached) => {
            Ok(Json(json!({ "status": "refreshed", "setup": cached })))
        }
        RefreshOutcome::Failed {
            stale: Some(cached),
            error,
        } => Ok(Json(json!({
            "status": "stale",
            "error": error.to_string(),
            "setup": cached,
        }))),
        RefreshOutcome::Failed { stale: None, error } => Err((
            StatusCode::BAD_GATEWAY,
            Json(json!({ "status": "failed", "error": error.to_string() })),
        )),
    }
}

// ─── Best setups ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum DirectionFilter {
    Long,
    Short,
    #[default]
    Any,
}

#[derive(Deserialize)]
struct BestQuery {
    direction: Option<DirectionFilter>,
    limit: Option<usize>,
}

async fn best_setups(State(state): State<AppState>, Query(q): Query<BestQuery>) -> Json<Value> {
    let direction = q.direction.unwrap_or_default();
    let limit = q.limit.unwrap_or(10).min(100);
    let setups = best_for_direction(state.refresher.cache().all().await, direction, limit);
    Json(json!({
        "direction": format!("{direction:?}").to_lowercase(),
        "count": setups.len(),
        "setups": setups,
    }))
}

/// Actionable setups for a direction, strongest conviction first. Conviction
/// is distance from the neutral midpoint, so the best short (lowest score)
/// ranks the same way the best long (highest score) does.
fn best_for_direction(
    setups: Vec<CachedSetup>,
    direction: DirectionFilter,
    limit: usize,
) -> Vec<CachedSetup> {
    let mut picked: Vec<CachedSetup> = setups
        .into_iter()
        .filter(|c| match direction {
            DirectionFilter::Long => c.setup.signal.is_long(),
            DirectionFilter::Short => c.setup.signal.is_short(),
            DirectionFilter::Any => c.setup.signal != Signal::Neutral,
        })
        .collect();
    picked.sort_by(|a, b| {
        let ca = (a.setup.overall_score - 50.0).abs();
        let cb = (b.setup.overall_score - 50.0).abs();
        cb.partial_cmp(&ca).unwrap_or(std::cmp::Ordering::Equal)
    });
    picked.truncate(limit);
    picked
}
