use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::info;
use mongodb::bson::Bson;

use super::models::{PlayerFilter, TournamentFilter};
use super::pipelines::{CARDS_POPULARITY_LIMIT, MIN_DECK_GAMES, TOP_PLAYERS_LIMIT};
use super::store::StatsStore;
use crate::api::models::{
    CardPopularity, DeckWinrate, Format, Kpis, Location, MetagameSummary, PlayerStats, TopPlayer,
    TournamentListItem, TournamentSummary,
};
use crate::domain::{Address, Card, Dataset, Player, Tournament};
use crate::errors::DbError;

const VERSION_LABEL: &str = "in-memory dataset";

/// Evaluates the dashboard queries over a dataset loaded into memory.
///
/// Joins behave like `$lookup` followed by `$unwind`: rows whose referenced
/// document is missing are dropped.
pub struct MemoryStatsStore {
    dataset: Dataset,
}

impl MemoryStatsStore {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let dataset: Dataset = serde_json::from_str(json).context("Failed to parse fixture dataset")?;
        Ok(Self::new(dataset))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read fixture dataset: {}", path.display()))?;
        let store = Self::from_json(&json)?;

        info!(
            "Loaded fixture dataset from {}: {} tournaments, {} players, {} cards, {} addresses",
            path.display(),
            store.dataset.tournaments.len(),
            store.dataset.players.len(),
            store.dataset.cards.len(),
            store.dataset.addresses.len(),
        );
        Ok(store)
    }

    fn players_by_id(&self) -> HashMap<i64, &Player> {
        self.dataset.players.iter().map(|p| (p.id, p)).collect()
    }

    fn cards_by_id(&self) -> HashMap<i64, &Card> {
        self.dataset.cards.iter().map(|c| (c.id, c)).collect()
    }

    fn addresses_by_id(&self) -> HashMap<i64, &Address> {
        self.dataset.addresses.iter().map(|a| (a.id, a)).collect()
    }

    /// Standing totals grouped by player, before the player join.
    fn standing_totals(&self) -> BTreeMap<i64, StandingTotals> {
        let mut totals: BTreeMap<i64, StandingTotals> = BTreeMap::new();
        for standing in self.dataset.tournaments.iter().flat_map(|t| &t.classificacao) {
            let entry = totals.entry(standing.id_jogador).or_default();
            entry.pontos += standing.pontos_totais;
            entry.vitorias += standing.vitorias;
            entry.derrotas += standing.derrotas;
            entry.premios += standing.premios;
            entry.eventos += 1;
        }
        totals
    }

    /// Tournaments newest first, ordered like a descending `$sort` on `data_torneio`.
    fn tournaments_by_date_desc(&self) -> Vec<&Tournament> {
        let mut tournaments: Vec<&Tournament> = self.dataset.tournaments.iter().collect();
        tournaments.sort_by(|a, b| compare_dates(&b.data_torneio, &a.data_torneio));
        tournaments
    }
}

#[derive(Debug, Default)]
struct StandingTotals {
    pontos: f64,
    vitorias: i64,
    derrotas: i64,
    premios: f64,
    eventos: i64,
}

#[derive(Debug, Default)]
struct DeckTally {
    jogos: i64,
    vitorias: i64,
}

impl DeckTally {
    fn win_rate(&self) -> f64 {
        if self.jogos > 0 {
            self.vitorias as f64 / self.jogos as f64
        } else {
            0.0
        }
    }
}

/// Sort key following MongoDB's cross-type ordering: missing/null, numbers, strings, dates.
fn date_sort_key(value: &Option<Bson>) -> (u8, f64, &str) {
    match value {
        None | Some(Bson::Null) => (0, 0.0, ""),
        Some(Bson::Int32(v)) => (1, f64::from(*v), ""),
        Some(Bson::Int64(v)) => (1, *v as f64, ""),
        Some(Bson::Double(v)) => (1, *v, ""),
        Some(Bson::String(s)) => (2, 0.0, s.as_str()),
        Some(Bson::DateTime(d)) => (3, d.timestamp_millis() as f64, ""),
        Some(_) => (4, 0.0, ""),
    }
}

fn compare_dates(a: &Option<Bson>, b: &Option<Bson>) -> Ordering {
    let (rank_a, num_a, text_a) = date_sort_key(a);
    let (rank_b, num_b, text_b) = date_sort_key(b);
    rank_a
        .cmp(&rank_b)
        .then(num_a.total_cmp(&num_b))
        .then_with(|| text_a.cmp(text_b))
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl StatsStore for MemoryStatsStore {
    async fn ping(&self) -> Result<String, DbError> {
        Ok(VERSION_LABEL.to_string())
    }

    async fn kpis(&self) -> Result<Kpis, DbError> {
        let dataset = &self.dataset;
        Ok(Kpis {
            total_torneios: dataset.tournaments.len() as u64,
            total_jogadores: dataset.players.len() as u64,
            total_decks: dataset.players.iter().map(|p| p.decks.len() as i64).sum(),
            premio_total: dataset.tournaments.iter().map(|t| t.premio_total).sum(),
        })
    }

    async fn top_players(&self) -> Result<Vec<TopPlayer>, DbError> {
        let players = self.players_by_id();
        let mut rows: Vec<TopPlayer> = self
            .standing_totals()
            .into_iter()
            .filter_map(|(id, totals)| {
                players.get(&id).map(|player| TopPlayer {
                    id_jogador: player.id.into(),
                    nome_jogador: Some(player.nome.clone()),
                    premio_total: totals.premios,
                    eventos: totals.eventos,
                })
            })
            .collect();

        rows.sort_by(|a, b| b.premio_total.total_cmp(&a.premio_total));
        rows.truncate(TOP_PLAYERS_LIMIT);
        Ok(rows)
    }

    async fn deck_winrate(&self) -> Result<Vec<DeckWinrate>, DbError> {
        let players = self.players_by_id();
        let mut tallies: BTreeMap<(i64, String, Option<String>), DeckTally> = BTreeMap::new();

        for entry in self.dataset.tournaments.iter().flat_map(|t| &t.partidas) {
            let Some(deck) = players
                .get(&entry.id_jogador)
                .and_then(|player| player.find_deck(entry.id_deck))
            else {
                continue;
            };

            let key = (entry.id_deck, deck.nome_deck.clone(), deck.estrategia.clone());
            let tally = tallies.entry(key).or_default();
            tally.jogos += 1;
            if entry.is_win() {
                tally.vitorias += 1;
            }
        }

        let mut rows: Vec<DeckWinrate> = tallies
            .into_iter()
            .filter(|(_, tally)| tally.jogos >= MIN_DECK_GAMES)
            .map(|((id_deck, nome_deck, estrategia), tally)| DeckWinrate {
                id_deck: id_deck.into(),
                nome_deck: Some(nome_deck),
                estrategia,
                win_rate: tally.win_rate(),
                jogos: tally.jogos,
            })
            .collect();

        rows.sort_by(|a, b| b.win_rate.total_cmp(&a.win_rate));
        Ok(rows)
    }

    async fn cards_popularity(&self) -> Result<Vec<CardPopularity>, DbError> {
        let mut totals: BTreeMap<i64, i64> = BTreeMap::new();
        for card in self
            .dataset
            .players
            .iter()
            .flat_map(|p| &p.decks)
            .flat_map(|d| &d.cartas)
        {
            *totals.entry(card.id_carta).or_default() += card.quantidade;
        }

        let cards = self.cards_by_id();
        let mut rows: Vec<CardPopularity> = totals
            .into_iter()
            .filter_map(|(id, total)| {
                cards.get(&id).map(|card| CardPopularity {
                    id_carta: card.id.into(),
                    nome_carta: Some(card.nome.clone()),
                    total_no_meta: total,
                })
            })
            .collect();

        rows.sort_by(|a, b| b.total_no_meta.cmp(&a.total_no_meta));
        rows.truncate(CARDS_POPULARITY_LIMIT);
        Ok(rows)
    }

    async fn locations(&self) -> Result<Vec<Location>, DbError> {
        let distinct: BTreeSet<Location> = self
            .dataset
            .addresses
            .iter()
            .map(|a| Location {
                cidade: a.cidade.clone(),
                estado: a.estado.clone(),
            })
            .collect();
        Ok(distinct.into_iter().collect())
    }

    async fn formats(&self) -> Result<Vec<Format>, DbError> {
        let distinct: BTreeSet<Option<String>> = self
            .dataset
            .tournaments
            .iter()
            .map(|t| t.formato.clone())
            .collect();
        Ok(distinct
            .into_iter()
            .map(|formato| Format { formato })
            .collect())
    }

    async fn tournaments_list(&self) -> Result<Vec<TournamentListItem>, DbError> {
        Ok(self
            .tournaments_by_date_desc()
            .into_iter()
            .map(|t| TournamentListItem {
                id_torneio: t.id.into(),
                nome_torneio: Some(t.nome_torneio.clone()),
                data_torneio: t.data_torneio.clone(),
            })
            .collect())
    }

    async fn tournaments(&self, filter: &TournamentFilter) -> Result<Vec<TournamentSummary>, DbError> {
        let addresses = self.addresses_by_id();

        Ok(self
            .tournaments_by_date_desc()
            .into_iter()
            .filter_map(|t| {
                let address = t.id_endereco.and_then(|id| addresses.get(&id))?;
                Some((t, *address))
            })
            .filter(|(t, address)| {
                let city_matches = filter
                    .cidade
                    .as_ref()
                    .is_none_or(|cidade| address.cidade.as_ref() == Some(cidade));
                let format_matches = filter
                    .formato
                    .as_ref()
                    .is_none_or(|formato| t.formato.as_ref() == Some(formato));
                city_matches && format_matches
            })
            .map(|(t, address)| TournamentSummary {
                id_torneio: t.id.into(),
                nome_torneio: Some(t.nome_torneio.clone()),
                formato: t.formato.clone(),
                data_torneio: t.data_torneio.clone(),
                num_rodadas: t.num_rodadas,
                cidade: address.cidade.clone(),
                estado: address.estado.clone(),
                premio_total: t.premio_total,
            })
            .collect())
    }

    async fn metagame(&self, tournament_id: i64) -> Result<Vec<MetagameSummary>, DbError> {
        Ok(self
            .dataset
            .tournaments
            .iter()
            .filter(|t| t.id == tournament_id)
            .map(|t| {
                let Some(metagame) = &t.metagame else {
                    return MetagameSummary::default();
                };
                let card = |index: usize| metagame.top_cards.get(index).cloned();
                MetagameSummary {
                    estrategia: metagame.top_strat.clone(),
                    top_1_card: card(0),
                    top_2_card: card(1),
                    top_3_card: card(2),
                    top_4_card: card(3),
                }
            })
            .collect())
    }

    async fn players(&self, filter: &PlayerFilter) -> Result<Vec<PlayerStats>, DbError> {
        let players = self.players_by_id();
        let mut rows: Vec<PlayerStats> = self
            .standing_totals()
            .into_iter()
            .filter_map(|(id, totals)| players.get(&id).map(|player| (*player, totals)))
            .filter(|(player, _)| {
                filter
                    .name_contains
                    .as_deref()
                    .is_none_or(|name| contains_ignore_case(&player.nome, name))
            })
            .map(|(player, totals)| PlayerStats {
                id_jogador: player.id.into(),
                nome_jogador: Some(player.nome.clone()),
                pontos_total: totals.pontos,
                vitorias: totals.vitorias,
                derrotas: totals.derrotas,
                premio_total: totals.premios,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.premio_total
                .total_cmp(&a.premio_total)
                .then(b.pontos_total.total_cmp(&a.pontos_total))
        });
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Deck, DeckCard, MatchEntry, Standing};

    const FIXTURE: &str = include_str!("../../tests/fixtures/dataset.json");

    fn fixture_store() -> MemoryStatsStore {
        MemoryStatsStore::from_json(FIXTURE).unwrap()
    }

    fn player(id: i64, nome: &str, decks: Vec<Deck>) -> Player {
        Player {
            id,
            nome: nome.to_string(),
            decks,
        }
    }

    fn deck(id: i64, cartas: Vec<DeckCard>) -> Deck {
        Deck {
            id,
            nome_deck: format!("Deck {id}"),
            estrategia: Some("Midrange".to_string()),
            cartas,
        }
    }

    fn tournament_with(standings: Vec<Standing>, matches: Vec<MatchEntry>) -> Tournament {
        Tournament {
            id: 1,
            nome_torneio: "Generated".to_string(),
            classificacao: standings,
            partidas: matches,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn kpis_count_everything() {
        let kpis = fixture_store().kpis().await.unwrap();

        assert_eq!(kpis.total_torneios, 4);
        assert_eq!(kpis.total_jogadores, 5);
        assert_eq!(kpis.total_decks, 5);
        assert_eq!(kpis.premio_total, 1800.0);
    }

    #[tokio::test]
    async fn kpis_of_empty_dataset_are_zero() {
        let kpis = MemoryStatsStore::new(Dataset::default()).kpis().await.unwrap();

        assert_eq!(kpis.total_torneios, 0);
        assert_eq!(kpis.total_decks, 0);
        assert_eq!(kpis.premio_total, 0.0);
    }

    #[tokio::test]
    async fn top_players_sum_prizes_and_events() {
        let rows = fixture_store().top_players().await.unwrap();

        let ana = rows.iter().find(|r| r.id_jogador == Bson::Int64(1)).unwrap();
        assert_eq!(ana.premio_total, 600.0);
        assert_eq!(ana.eventos, 2);
        assert_eq!(rows.len(), 4);
        assert_eq!(rows.last().unwrap().nome_jogador.as_deref(), Some("Carlos Dias"));
    }

    #[tokio::test]
    async fn top_players_keeps_ten_highest() {
        let standings = (1..=15)
            .map(|id| Standing {
                id_jogador: id,
                premios: (id * 10) as f64,
                ..Default::default()
            })
            .collect();
        let dataset = Dataset {
            tournaments: vec![tournament_with(standings, vec![])],
            players: (1..=15).map(|id| player(id, &format!("P{id}"), vec![])).collect(),
            ..Default::default()
        };

        let rows = MemoryStatsStore::new(dataset).top_players().await.unwrap();

        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].id_jogador, Bson::Int64(15));
        assert_eq!(rows[9].id_jogador, Bson::Int64(6));
        assert!(rows.windows(2).all(|w| w[0].premio_total > w[1].premio_total));
    }

    #[tokio::test]
    async fn deck_winrate_filters_small_samples_and_sorts() {
        let rows = fixture_store().deck_winrate().await.unwrap();
        let ids: Vec<i64> = rows.iter().filter_map(|r| r.id_deck.as_i64()).collect();

        assert_eq!(ids, [21, 30, 10, 20]);
        assert!(rows.iter().all(|r| r.jogos >= MIN_DECK_GAMES));

        let burn = rows.iter().find(|r| r.id_deck == Bson::Int64(10)).unwrap();
        assert_eq!(burn.jogos, 6);
        assert_eq!(burn.win_rate, 4.0 / 6.0);
        assert_eq!(burn.estrategia.as_deref(), Some("Aggro"));
    }

    #[tokio::test]
    async fn deck_without_wins_has_zero_rate() {
        let matches = (0..3)
            .map(|_| MatchEntry {
                id_jogador: 1,
                id_deck: 5,
                resultado: 0,
            })
            .collect();
        let dataset = Dataset {
            tournaments: vec![tournament_with(vec![], matches)],
            players: vec![player(1, "Solo", vec![deck(5, vec![])])],
            ..Default::default()
        };

        let rows = MemoryStatsStore::new(dataset).deck_winrate().await.unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].win_rate, 0.0);
        assert_eq!(DeckTally::default().win_rate(), 0.0);
    }

    #[tokio::test]
    async fn cards_popularity_joins_card_names() {
        let rows = fixture_store().cards_popularity().await.unwrap();

        assert_eq!(rows[0].nome_carta.as_deref(), Some("Mountain"));
        assert_eq!(rows[0].total_no_meta, 23);
        assert_eq!(rows[1].total_no_meta, 7);
        // card 999 has no document in Cartas
        assert!(rows.iter().all(|r| r.id_carta != Bson::Int64(999)));
    }

    #[tokio::test]
    async fn cards_popularity_keeps_thirty_highest() {
        let cartas: Vec<DeckCard> = (1..=40)
            .map(|id| DeckCard {
                id_carta: id,
                quantidade: id,
            })
            .collect();
        let dataset = Dataset {
            players: vec![player(1, "Collector", vec![deck(1, cartas)])],
            cards: (1..=40)
                .map(|id| Card {
                    id,
                    nome: format!("Card {id}"),
                })
                .collect(),
            ..Default::default()
        };

        let rows = MemoryStatsStore::new(dataset).cards_popularity().await.unwrap();

        assert_eq!(rows.len(), 30);
        assert_eq!(rows[0].total_no_meta, 40);
        assert_eq!(rows[29].total_no_meta, 11);
        assert!(rows.windows(2).all(|w| w[0].total_no_meta > w[1].total_no_meta));
    }

    #[tokio::test]
    async fn locations_are_distinct_and_sorted() {
        let rows = fixture_store().locations().await.unwrap();
        let cities: Vec<_> = rows.iter().map(|l| l.cidade.as_deref().unwrap()).collect();

        assert_eq!(cities, ["Campinas", "Curitiba", "São Paulo"]);
    }

    #[tokio::test]
    async fn formats_are_distinct_and_sorted() {
        let rows = fixture_store().formats().await.unwrap();
        let formats: Vec<_> = rows.iter().map(|f| f.formato.as_deref().unwrap()).collect();

        assert_eq!(formats, ["Legacy", "Modern", "Pioneer"]);
    }

    #[tokio::test]
    async fn tournaments_list_is_newest_first() {
        let rows = fixture_store().tournaments_list().await.unwrap();
        let ids: Vec<i64> = rows.iter().filter_map(|t| t.id_torneio.as_i64()).collect();

        assert_eq!(ids, [2, 1, 3, 4]);
    }

    #[tokio::test]
    async fn tournaments_apply_every_filter() {
        let store = fixture_store();
        let ids = |rows: Vec<TournamentSummary>| rows.iter().filter_map(|t| t.id_torneio.as_i64()).collect::<Vec<_>>();

        let all = store.tournaments(&TournamentFilter::default()).await.unwrap();
        assert_eq!(ids(all), [2, 1, 3]);

        let modern = TournamentFilter::new(None, Some("Modern".into()));
        assert_eq!(ids(store.tournaments(&modern).await.unwrap()), [1, 3]);

        let both = TournamentFilter::new(Some("Curitiba".into()), Some("Modern".into()));
        let rows = store.tournaments(&both).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].estado.as_deref(), Some("PR"));

        let none = TournamentFilter::new(Some("Curitiba".into()), Some("Pioneer".into()));
        assert!(store.tournaments(&none).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn metagame_projects_top_cards() {
        let store = fixture_store();

        let open = store.metagame(1).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].estrategia.as_deref(), Some("Aggro"));
        assert_eq!(open[0].top_4_card, Some(Bson::String("Brainstorm".into())));

        let copa = store.metagame(2).await.unwrap();
        assert_eq!(copa[0].top_1_card, Some(Bson::String("Llanowar Elves".into())));
        assert_eq!(copa[0].top_2_card, None);

        assert_eq!(store.metagame(3).await.unwrap(), vec![MetagameSummary::default()]);
        assert!(store.metagame(42).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn players_sorted_by_prize_then_points() {
        let rows = fixture_store().players(&PlayerFilter::default()).await.unwrap();
        let names: Vec<&str> = rows.iter().filter_map(|p| p.nome_jogador.as_deref()).collect();

        assert_eq!(names, ["Bruno Lima", "Ana Souza", "Mariana Costa", "Carlos Dias"]);
        assert_eq!(rows[0].pontos_total, 19.0);
        assert_eq!(rows[0].vitorias, 6);
        assert_eq!(rows[0].derrotas, 3);
    }

    #[tokio::test]
    async fn player_name_filter_is_case_insensitive_substring() {
        let store = fixture_store();

        for query in ["ana", "ANA", "  aNa "] {
            let rows = store.players(&PlayerFilter::new(Some(query.into()))).await.unwrap();
            let names: Vec<&str> = rows.iter().filter_map(|p| p.nome_jogador.as_deref()).collect();
            assert_eq!(names, ["Ana Souza", "Mariana Costa"], "query {query:?}");
        }

        let literal = store.players(&PlayerFilter::new(Some("a.a".into()))).await.unwrap();
        assert!(literal.is_empty());
    }

    #[test]
    fn dates_order_like_mongo() {
        let date = Some(Bson::DateTime(mongodb::bson::DateTime::from_millis(0)));
        let text = Some(Bson::String("2024-01-01".into()));

        assert_eq!(compare_dates(&None, &text), Ordering::Less);
        assert_eq!(compare_dates(&text, &date), Ordering::Less);
        assert_eq!(
            compare_dates(&Some(Bson::String("2024-02-01".into())), &text),
            Ordering::Greater
        );
    }

    #[test]
    fn missing_fixture_file_is_reported() {
        let error = MemoryStatsStore::from_path("does/not/exist.json").err().unwrap();
        assert!(error.to_string().contains("does/not/exist.json"));
    }
}
