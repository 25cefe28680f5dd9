use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{self, Bson, Document, doc};
use serde::de::DeserializeOwned;

use super::connection::{ConnectionManager, MongoConnector};
use super::models::{PlayerFilter, TournamentFilter};
use super::pipelines;
use super::store::StatsStore;
use crate::api::models::{
    CardPopularity, DeckWinrate, Format, Kpis, Location, MetagameSummary, PlayerStats, TopPlayer,
    TournamentListItem, TournamentSummary,
};
use crate::config::DatabaseSettings;
use crate::domain::{ADDRESSES, PLAYERS, TOURNAMENTS};
use crate::errors::DbError;

const VERSION_LABEL: &str = "MongoDB (ping ok)";

/// Runs every query as an aggregation pipeline on the shared MongoDB handle.
pub struct MongoStatsStore {
    connections: ConnectionManager<MongoConnector>,
}

impl MongoStatsStore {
    pub fn new(settings: DatabaseSettings) -> Self {
        Self {
            connections: ConnectionManager::new(MongoConnector::new(settings)),
        }
    }

    pub fn connections(&self) -> &ConnectionManager<MongoConnector> {
        &self.connections
    }

    async fn aggregate<T: DeserializeOwned>(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<Vec<T>, DbError> {
        let rows = self.aggregate_raw(collection, pipeline).await?;
        decode_rows(rows)
    }

    async fn aggregate_raw(
        &self,
        collection: &str,
        pipeline: Vec<Document>,
    ) -> Result<Vec<Document>, DbError> {
        let handle = self.connections.acquire().await?;
        let cursor = handle
            .db
            .collection::<Document>(collection)
            .aggregate(pipeline)
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self, collection: &str) -> Result<u64, DbError> {
        let handle = self.connections.acquire().await?;
        Ok(handle
            .db
            .collection::<Document>(collection)
            .count_documents(doc! {})
            .await?)
    }
}

fn decode_rows<T: DeserializeOwned>(rows: Vec<Document>) -> Result<Vec<T>, DbError> {
    rows.into_iter()
        .map(|row| bson::from_document(row).map_err(DbError::from))
        .collect()
}

/// Reads `total` from the single row of a `{ _id: null, total: ... }` group; 0 when empty.
fn group_total(rows: &[Document]) -> f64 {
    rows.first()
        .and_then(|row| row.get("total"))
        .and_then(|total| match total {
            Bson::Int32(v) => Some(f64::from(*v)),
            Bson::Int64(v) => Some(*v as f64),
            Bson::Double(v) => Some(*v),
            _ => None,
        })
        .unwrap_or(0.0)
}

#[async_trait]
impl StatsStore for MongoStatsStore {
    async fn ping(&self) -> Result<String, DbError> {
        let handle = self.connections.acquire().await?;
        handle.db.run_command(doc! { "ping": 1 }).await?;
        Ok(VERSION_LABEL.to_string())
    }

    async fn kpis(&self) -> Result<Kpis, DbError> {
        let (total_torneios, total_jogadores, decks, prizes) = tokio::try_join!(
            self.count(TOURNAMENTS),
            self.count(PLAYERS),
            self.aggregate_raw(PLAYERS, pipelines::total_decks()),
            self.aggregate_raw(TOURNAMENTS, pipelines::total_prize()),
        )?;

        Ok(Kpis {
            total_torneios,
            total_jogadores,
            total_decks: group_total(&decks) as i64,
            premio_total: group_total(&prizes),
        })
    }

    async fn top_players(&self) -> Result<Vec<TopPlayer>, DbError> {
        self.aggregate(TOURNAMENTS, pipelines::top_players()).await
    }

    async fn deck_winrate(&self) -> Result<Vec<DeckWinrate>, DbError> {
        self.aggregate(TOURNAMENTS, pipelines::deck_winrate()).await
    }

    async fn cards_popularity(&self) -> Result<Vec<CardPopularity>, DbError> {
        self.aggregate(PLAYERS, pipelines::cards_popularity()).await
    }

    async fn locations(&self) -> Result<Vec<Location>, DbError> {
        self.aggregate(ADDRESSES, pipelines::locations()).await
    }

    async fn formats(&self) -> Result<Vec<Format>, DbError> {
        self.aggregate(TOURNAMENTS, pipelines::formats()).await
    }

    async fn tournaments_list(&self) -> Result<Vec<TournamentListItem>, DbError> {
        self.aggregate(TOURNAMENTS, pipelines::tournaments_list()).await
    }

    async fn tournaments(&self, filter: &TournamentFilter) -> Result<Vec<TournamentSummary>, DbError> {
        self.aggregate(TOURNAMENTS, pipelines::tournaments(filter)).await
    }

    async fn metagame(&self, tournament_id: i64) -> Result<Vec<MetagameSummary>, DbError> {
        self.aggregate(TOURNAMENTS, pipelines::metagame(tournament_id)).await
    }

    async fn players(&self, filter: &PlayerFilter) -> Result<Vec<PlayerStats>, DbError> {
        self.aggregate(TOURNAMENTS, pipelines::players(filter)).await
    }

    async fn shutdown(&self) {
        self.connections.release().await;
    }
}
