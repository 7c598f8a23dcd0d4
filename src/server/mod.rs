mod handlers;
mod state;

use axum::routing::{get, post};
use axum::Router;
use state::AppState;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::geo::GeoRegistry;

pub fn build_router(registry: GeoRegistry) -> Router {
    let state = Arc::new(AppState { registry });

    Router::new()
        .route("/api/provinces", get(handlers::list_provinces))
        .route("/api/provinces/resolve", get(handlers::resolve_province))
        .route("/api/provinces/search", get(handlers::search_provinces))
        .route("/api/regions", get(handlers::list_regions))
        .route("/api/regions/provinces", get(handlers::region_provinces))
        .route("/api/comuni/normalize", get(handlers::normalize_comune))
        .route("/api/comuni/match", get(handlers::match_comuni))
        .route("/api/leads/filter", post(handlers::filter_leads))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(host: &str, port: u16, registry: GeoRegistry) -> std::io::Result<()> {
    let app = build_router(registry);
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("italia-geo server listening on http://{}", addr);
    axum::serve(listener, app).await
}
