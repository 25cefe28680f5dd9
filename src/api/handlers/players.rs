use std::sync::Arc;

use axum::{extract::State, response::Json};

use super::{AppState, QueryParams};
use crate::api::models::PlayerStats;
use crate::database::PlayerFilter;
use crate::errors::ApiError;

pub async fn get_players(
    State(state): State<Arc<AppState>>,
    params: QueryParams,
) -> Result<Json<Vec<PlayerStats>>, ApiError> {
    let filter = PlayerFilter::new(params.get("nome"));
    Ok(Json(state.store.players(&filter).await?))
}
