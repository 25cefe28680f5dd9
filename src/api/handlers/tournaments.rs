use std::sync::Arc;

use axum::{extract::State, response::Json};

use super::{AppState, QueryParams};
use crate::api::models::{Format, Location, MetagameSummary, TournamentListItem, TournamentSummary};
use crate::database::TournamentFilter;
use crate::errors::ApiError;

pub async fn get_locations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Location>>, ApiError> {
    Ok(Json(state.store.locations().await?))
}

pub async fn get_formats(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Format>>, ApiError> {
    Ok(Json(state.store.formats().await?))
}

pub async fn get_tournaments_list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TournamentListItem>>, ApiError> {
    Ok(Json(state.store.tournaments_list().await?))
}

pub async fn get_tournaments(
    State(state): State<Arc<AppState>>,
    params: QueryParams,
) -> Result<Json<Vec<TournamentSummary>>, ApiError> {
    let filter = TournamentFilter::new(params.get("cidade"), params.get("formato"));
    Ok(Json(state.store.tournaments(&filter).await?))
}

pub async fn get_metagame(
    State(state): State<Arc<AppState>>,
    params: QueryParams,
) -> Result<Json<Vec<MetagameSummary>>, ApiError> {
    let tournament_id = parse_tournament_id(params.get("id_torneio").as_deref())?;
    Ok(Json(state.store.metagame(tournament_id).await?))
}

/// Accepts only a complete integer: `12abc` and `1.5` are rejected rather than truncated.
fn parse_tournament_id(raw: Option<&str>) -> Result<i64, ApiError> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .ok_or(ApiError::InvalidTournamentId)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_integers() {
        assert_eq!(parse_tournament_id(Some("42")).unwrap(), 42);
        assert_eq!(parse_tournament_id(Some(" 7 ")).unwrap(), 7);
        assert_eq!(parse_tournament_id(Some("-3")).unwrap(), -3);
    }

    #[test]
    fn rejects_missing_or_malformed_ids() {
        for raw in [None, Some(""), Some("abc"), Some("12abc"), Some("1.5")] {
            assert!(
                matches!(parse_tournament_id(raw), Err(ApiError::InvalidTournamentId)),
                "accepted {raw:?}"
            );
        }
    }
}
