use std::net::SocketAddr;

use axum::{
    Json,
    extract::{ConnectInfo, State},
    http::{HeaderMap, header::USER_AGENT},
};
use serde_json::{Value, json};

use crate::{
    models::{StatsResponse, TrackResponse},
    state::AppState,
};

/// Address recorded when the connection carries no peer info.
pub const UNKNOWN_ADDRESS: &str = "unknown";

pub async fn api_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Visitor Tracker API",
        "status": "running",
        "storage": state.backend,
        "endpoints": {
            "/api": "API info (GET)",
            "/api/track": "Track a new visit (POST)",
            "/api/stats": "Get visitor statistics (GET)"
        }
    }))
}

pub async fn track_visit(
    State(state): State<AppState>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    headers: HeaderMap,
) -> Json<TrackResponse> {
    let address = connect_info
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_ADDRESS.to_string());
    let agent = headers.get(USER_AGENT).and_then(|value| value.to_str().ok());

    Json(state.recorder.record(&address, agent).await)
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(state.reporter.stats().await)
}
