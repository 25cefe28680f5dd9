use std::sync::Arc;

use axum::{extract::State, response::Json};

use super::AppState;
use crate::api::models::{CardPopularity, DeckWinrate, Kpis, TopPlayer};
use crate::errors::ApiError;

pub async fn get_kpis(State(state): State<Arc<AppState>>) -> Result<Json<Kpis>, ApiError> {
    Ok(Json(state.store.kpis().await?))
}

pub async fn get_top_players(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TopPlayer>>, ApiError> {
    Ok(Json(state.store.top_players().await?))
}

pub async fn get_deck_winrate(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<DeckWinrate>>, ApiError> {
    Ok(Json(state.store.deck_winrate().await?))
}

pub async fn get_cards_popularity(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CardPopularity>>, ApiError> {
    Ok(Json(state.store.cards_popularity().await?))
}
