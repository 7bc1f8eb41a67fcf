use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};

use crate::AppState;

pub fn health_router() -> Router<AppState> {
    Router::new().route("/api/health", get(health))
}

/// Health check endpoint. Used by deploy checks and ops scripts; reports
/// whether the first refresh cycle has completed yet.
async fn health(State(state): State<AppState>) -> Json<Value> {
    let last_refresh = state.refresher.last_cycle().await;
    let cached = state.refresher.cache().all().await.len();

    Json(json!({
        "status": if last_refresh.is_some() { "ok" } else { "warming_up" },
        "symbols": state.refresher.symbols().len(),
        "setups_cached": cached,
        "last_refresh": last_refresh,
        "uptime_secs": (Utc::now() - state.started_at).num_seconds(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    #[tokio::test]
    async fn health_reports_warming_up_before_first_cycle() {
        let app = Router::new()
            .merge(health_router())
            .with_state(test_state(&["BTC-PERP"]));
        let resp = app
            .oneshot(Request::get("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
