use std::path::Path;
use std::sync::Arc;

use axum::{Router, routing::get};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::api::handlers::{
    AppState, health,
    players::get_players,
    summary::{get_cards_popularity, get_deck_winrate, get_kpis, get_top_players},
    tournaments::{get_formats, get_locations, get_metagame, get_tournaments, get_tournaments_list},
};

/// API routes, with the dashboard's static files served for every other path.
pub fn create_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/kpis", get(get_kpis))
        .route("/api/top-players", get(get_top_players))
        .route("/api/deck-winrate", get(get_deck_winrate))
        .route("/api/cards-popularity", get(get_cards_popularity))
        .route("/api/locations", get(get_locations))
        .route("/api/formats", get(get_formats))
        .route("/api/tournaments/list", get(get_tournaments_list))
        .route("/api/tournaments", get(get_tournaments))
        .route("/api/metagame", get(get_metagame))
        .route("/api/players", get(get_players))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
