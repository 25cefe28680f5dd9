//! Aggregation pipelines behind each endpoint.
//!
//! Each function returns the stage list for one query; `MongoStatsStore`
//! runs them as-is and `MemoryStatsStore` mirrors their semantics.

use mongodb::bson::{Document, doc};

use super::models::{PlayerFilter, TournamentFilter};
use crate::domain::{ADDRESSES, CARDS, PLAYERS};

pub const TOP_PLAYERS_LIMIT: usize = 10;
pub const CARDS_POPULARITY_LIMIT: usize = 30;
pub const MIN_DECK_GAMES: i64 = 3;
/// Number of `top_cards` entries projected by the metagame query.
pub const METAGAME_TOP_CARDS: usize = 4;

/// Runs against `Jogadores`: total number of embedded decks.
pub fn total_decks() -> Vec<Document> {
    vec![
        doc! { "$project": { "decksCount": { "$size": { "$ifNull": ["$decks", []] } } } },
        doc! { "$group": { "_id": null, "total": { "$sum": "$decksCount" } } },
    ]
}

/// Runs against `Torneios`: sum of every prize pool.
pub fn total_prize() -> Vec<Document> {
    vec![doc! { "$group": { "_id": null, "total": { "$sum": "$premio_total" } } }]
}

/// Runs against `Torneios`.
pub fn top_players() -> Vec<Document> {
    vec![
        doc! { "$unwind": "$classificacao" },
        doc! {
            "$group": {
                "_id": "$classificacao.id_jogador",
                "premio_total": { "$sum": "$classificacao.premios" },
                "eventos": { "$sum": 1 },
            }
        },
        lookup_by_id(PLAYERS, "_id", "jogador"),
        doc! { "$unwind": "$jogador" },
        doc! {
            "$project": {
                "_id": 0,
                "id_jogador": "$jogador._id",
                "nome_jogador": "$jogador.nome",
                "premio_total": 1,
                "eventos": 1,
            }
        },
        doc! { "$sort": { "premio_total": -1 } },
        doc! { "$limit": TOP_PLAYERS_LIMIT as i64 },
    ]
}

/// Runs against `Torneios`. Each match is joined to the deck embedded in its player.
pub fn deck_winrate() -> Vec<Document> {
    vec![
        doc! { "$unwind": "$partidas" },
        doc! {
            "$lookup": {
                "from": PLAYERS,
                "let": { "jogadorId": "$partidas.id_jogador", "deckId": "$partidas.id_deck" },
                "pipeline": [
                    { "$match": { "$expr": { "$eq": ["$_id", "$$jogadorId"] } } },
                    { "$unwind": "$decks" },
                    { "$match": { "$expr": { "$eq": ["$decks._id", "$$deckId"] } } },
                    { "$project": { "_id": 0, "nome_deck": "$decks.nome_deck", "estrategia": "$decks.estrategia" } },
                ],
                "as": "deckInfo",
            }
        },
        doc! { "$unwind": "$deckInfo" },
        doc! {
            "$group": {
                "_id": {
                    "deckId": "$partidas.id_deck",
                    "nome_deck": "$deckInfo.nome_deck",
                    "estrategia": "$deckInfo.estrategia",
                },
                "jogos": { "$sum": 1 },
                "vitorias": { "$sum": { "$cond": [{ "$eq": ["$partidas.resultado", 1] }, 1, 0] } },
            }
        },
        doc! { "$match": { "jogos": { "$gte": MIN_DECK_GAMES } } },
        doc! {
            "$project": {
                "_id": 0,
                "id_deck": "$_id.deckId",
                "nome_deck": "$_id.nome_deck",
                "estrategia": "$_id.estrategia",
                "win_rate": {
                    "$cond": [
                        { "$gt": ["$jogos", 0] },
                        { "$divide": ["$vitorias", "$jogos"] },
                        0.0,
                    ]
                },
                "jogos": 1,
            }
        },
        doc! { "$sort": { "win_rate": -1 } },
    ]
}

/// Runs against `Jogadores`.
pub fn cards_popularity() -> Vec<Document> {
    vec![
        doc! { "$unwind": "$decks" },
        doc! { "$unwind": "$decks.cartas" },
        doc! {
            "$group": {
                "_id": "$decks.cartas.id_carta",
                "total_no_meta": { "$sum": "$decks.cartas.quantidade" },
            }
        },
        lookup_by_id(CARDS, "_id", "carta"),
        doc! { "$unwind": "$carta" },
        doc! {
            "$project": {
                "_id": 0,
                "id_carta": "$carta._id",
                "nome_carta": "$carta.nome",
                "total_no_meta": 1,
            }
        },
        doc! { "$sort": { "total_no_meta": -1 } },
        doc! { "$limit": CARDS_POPULARITY_LIMIT as i64 },
    ]
}

/// Runs against `Enderecos`.
pub fn locations() -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": { "cidade": "$cidade", "estado": "$estado" } } },
        doc! { "$project": { "_id": 0, "cidade": "$_id.cidade", "estado": "$_id.estado" } },
        doc! { "$sort": { "cidade": 1, "estado": 1 } },
    ]
}

/// Runs against `Torneios`.
pub fn formats() -> Vec<Document> {
    vec![
        doc! { "$group": { "_id": "$formato" } },
        doc! { "$sort": { "_id": 1 } },
        doc! { "$project": { "_id": 0, "formato": "$_id" } },
    ]
}

/// Runs against `Torneios`: the dropdown list, newest first.
pub fn tournaments_list() -> Vec<Document> {
    vec![
        doc! {
            "$project": {
                "_id": 0,
                "id_torneio": "$_id",
                "nome_torneio": "$nome_torneio",
                "data_torneio": "$data_torneio",
            }
        },
        doc! { "$sort": { "data_torneio": -1 } },
    ]
}

/// Runs against `Torneios`. Tournaments without a matching address are dropped by the join.
pub fn tournaments(filter: &TournamentFilter) -> Vec<Document> {
    let mut criteria = Document::new();
    if let Some(cidade) = &filter.cidade {
        criteria.insert("endereco.cidade", cidade.as_str());
    }
    if let Some(formato) = &filter.formato {
        criteria.insert("formato", formato.as_str());
    }

    vec![
        lookup_by_id(ADDRESSES, "id_endereco", "endereco"),
        doc! { "$unwind": "$endereco" },
        doc! { "$match": criteria },
        doc! { "$sort": { "data_torneio": -1 } },
        doc! {
            "$project": {
                "_id": 0,
                "id_torneio": "$_id",
                "nome_torneio": "$nome_torneio",
                "formato": 1,
                "data_torneio": 1,
                "num_rodadas": 1,
                "cidade": "$endereco.cidade",
                "estado": "$endereco.estado",
                "premio_total": 1,
            }
        },
    ]
}

/// Runs against `Torneios`.
pub fn metagame(tournament_id: i64) -> Vec<Document> {
    let mut projection = doc! { "_id": 0, "estrategia": "$metagame.top_strat" };
    for index in 0..METAGAME_TOP_CARDS {
        projection.insert(
            format!("top_{}_card", index + 1),
            doc! { "$arrayElemAt": ["$metagame.top_cards", index as i32] },
        );
    }

    vec![
        doc! { "$match": { "_id": tournament_id } },
        doc! { "$project": projection },
    ]
}

/// Runs against `Torneios`: per-player totals across every standing.
pub fn players(filter: &PlayerFilter) -> Vec<Document> {
    let mut pipeline = vec![
        doc! { "$unwind": "$classificacao" },
        doc! {
            "$group": {
                "_id": "$classificacao.id_jogador",
                "pontos_total": { "$sum": "$classificacao.pontos_totais" },
                "vitorias": { "$sum": "$classificacao.vitorias" },
                "derrotas": { "$sum": "$classificacao.derrotas" },
                "premio_total": { "$sum": "$classificacao.premios" },
            }
        },
        lookup_by_id(PLAYERS, "_id", "jogador"),
        doc! { "$unwind": "$jogador" },
    ];

    if let Some(name) = &filter.name_contains {
        pipeline.push(doc! {
            "$match": { "jogador.nome": { "$regex": regex::escape(name), "$options": "i" } }
        });
    }

    pipeline.extend([
        doc! {
            "$project": {
                "_id": 0,
                "id_jogador": "$jogador._id",
                "nome_jogador": "$jogador.nome",
                "pontos_total": 1,
                "vitorias": 1,
                "derrotas": 1,
                "premio_total": 1,
            }
        },
        doc! { "$sort": { "premio_total": -1, "pontos_total": -1 } },
    ]);
    pipeline
}

fn lookup_by_id(from: &str, local_field: &str, alias: &str) -> Document {
    doc! {
        "$lookup": {
            "from": from,
            "localField": local_field,
            "foreignField": "_id",
            "as": alias,
        }
    }
}
