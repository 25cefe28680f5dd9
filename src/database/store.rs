use async_trait::async_trait;

use super::models::{PlayerFilter, TournamentFilter};
use crate::api::models::{
    CardPopularity, DeckWinrate, Format, Kpis, Location, MetagameSummary, PlayerStats, TopPlayer,
    TournamentListItem, TournamentSummary,
};
use crate::errors::DbError;

/// Read-only statistics queries backing the dashboard endpoints.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Checks the backend is reachable and returns a short version label.
    async fn ping(&self) -> Result<String, DbError>;

    async fn kpis(&self) -> Result<Kpis, DbError>;

    async fn top_players(&self) -> Result<Vec<TopPlayer>, DbError>;

    async fn deck_winrate(&self) -> Result<Vec<DeckWinrate>, DbError>;

    async fn cards_popularity(&self) -> Result<Vec<CardPopularity>, DbError>;

    async fn locations(&self) -> Result<Vec<Location>, DbError>;

    async fn formats(&self) -> Result<Vec<Format>, DbError>;

    async fn tournaments_list(&self) -> Result<Vec<TournamentListItem>, DbError>;

    async fn tournaments(&self, filter: &TournamentFilter) -> Result<Vec<TournamentSummary>, DbError>;

    /// Empty when no tournament has this id.
    async fn metagame(&self, tournament_id: i64) -> Result<Vec<MetagameSummary>, DbError>;

    async fn players(&self, filter: &PlayerFilter) -> Result<Vec<PlayerStats>, DbError>;

    /// Releases any connection held by the store.
    async fn shutdown(&self) {}
}
