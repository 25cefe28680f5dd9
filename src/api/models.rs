use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

use super::serializers::{bson_value, number, optional_bson, optional_whole_number, text, whole_number};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpis {
    pub total_torneios: u64,
    pub total_jogadores: u64,
    pub total_decks: i64,
    pub premio_total: f64,
}

/// Rows decoded from aggregation output accept whatever BSON types the stored
/// documents use: ids of any type, numbers stored as doubles, null names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopPlayer {
    #[serde(default, serialize_with = "bson_value")]
    pub id_jogador: Bson,
    #[serde(default, deserialize_with = "text")]
    pub nome_jogador: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pub premio_total: f64,
    #[serde(default, deserialize_with = "whole_number")]
    pub eventos: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckWinrate {
    #[serde(default, serialize_with = "bson_value")]
    pub id_deck: Bson,
    #[serde(default, deserialize_with = "text")]
    pub nome_deck: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub estrategia: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pub win_rate: f64,
    #[serde(default, deserialize_with = "whole_number")]
    pub jogos: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardPopularity {
    #[serde(default, serialize_with = "bson_value")]
    pub id_carta: Bson,
    #[serde(default, deserialize_with = "text")]
    pub nome_carta: Option<String>,
    #[serde(default, deserialize_with = "whole_number")]
    pub total_no_meta: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Location {
    #[serde(default, deserialize_with = "text")]
    pub cidade: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub estado: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Format {
    #[serde(default, deserialize_with = "text")]
    pub formato: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentListItem {
    #[serde(default, serialize_with = "bson_value")]
    pub id_torneio: Bson,
    #[serde(default, deserialize_with = "text")]
    pub nome_torneio: Option<String>,
    #[serde(default, serialize_with = "optional_bson")]
    pub data_torneio: Option<Bson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TournamentSummary {
    #[serde(default, serialize_with = "bson_value")]
    pub id_torneio: Bson,
    #[serde(default, deserialize_with = "text")]
    pub nome_torneio: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub formato: Option<String>,
    #[serde(default, serialize_with = "optional_bson")]
    pub data_torneio: Option<Bson>,
    #[serde(default, deserialize_with = "optional_whole_number")]
    pub num_rodadas: Option<i64>,
    #[serde(default, deserialize_with = "text")]
    pub cidade: Option<String>,
    #[serde(default, deserialize_with = "text")]
    pub estado: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pub premio_total: f64,
}

/// Metagame row of one tournament; absent fields are omitted like the stored document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetagameSummary {
    #[serde(default, deserialize_with = "text", skip_serializing_if = "Option::is_none")]
    pub estrategia: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "optional_bson"
    )]
    pub top_1_card: Option<Bson>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "optional_bson"
    )]
    pub top_2_card: Option<Bson>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "optional_bson"
    )]
    pub top_3_card: Option<Bson>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "optional_bson"
    )]
    pub top_4_card: Option<Bson>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(default, serialize_with = "bson_value")]
    pub id_jogador: Bson,
    #[serde(default, deserialize_with = "text")]
    pub nome_jogador: Option<String>,
    #[serde(default, deserialize_with = "number")]
    pub pontos_total: f64,
    #[serde(default, deserialize_with = "whole_number")]
    pub vitorias: i64,
    #[serde(default, deserialize_with = "whole_number")]
    pub derrotas: i64,
    #[serde(default, deserialize_with = "number")]
    pub premio_total: f64,
}
