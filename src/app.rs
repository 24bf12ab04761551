use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{api_info, get_stats, track_visit},
    state::AppState,
};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api", get(api_info))
        .route("/api/track", post(track_visit))
        .route("/api/stats", get(get_stats))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .with_state(state)
}

/// Any origin, method and header, with credentials. Wildcards cannot be
/// combined with credentials, so each is mirrored from the request.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
