use mongodb::bson::Bson;
use serde::{Deserialize, Serialize};

pub const TOURNAMENTS: &str = "Torneios";
pub const PLAYERS: &str = "Jogadores";
pub const CARDS: &str = "Cartas";
pub const ADDRESSES: &str = "Enderecos";

/// A dated competitive event, as stored in `Torneios`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(default)]
    pub nome_torneio: String,
    #[serde(default)]
    pub formato: Option<String>,
    /// BSON date in production data, plain string in hand-written dumps.
    #[serde(default)]
    pub data_torneio: Option<Bson>,
    #[serde(default)]
    pub id_endereco: Option<i64>,
    #[serde(default)]
    pub premio_total: f64,
    #[serde(default)]
    pub num_rodadas: Option<i64>,
    #[serde(default)]
    pub classificacao: Vec<Standing>,
    #[serde(default)]
    pub partidas: Vec<MatchEntry>,
    #[serde(default)]
    pub metagame: Option<Metagame>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub id_jogador: i64,
    #[serde(default)]
    pub pontos_totais: f64,
    #[serde(default)]
    pub vitorias: i64,
    #[serde(default)]
    pub derrotas: i64,
    #[serde(default)]
    pub premios: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchEntry {
    pub id_jogador: i64,
    pub id_deck: i64,
    /// 1 is a win; anything else is not.
    #[serde(default)]
    pub resultado: i64,
}

impl MatchEntry {
    pub fn is_win(&self) -> bool {
        self.resultado == 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Metagame {
    #[serde(default)]
    pub top_strat: Option<String>,
    #[serde(default)]
    pub top_cards: Vec<Bson>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Player {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub decks: Vec<Deck>,
}

impl Player {
    pub fn find_deck(&self, deck_id: i64) -> Option<&Deck> {
        self.decks.iter().find(|deck| deck.id == deck_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(default)]
    pub nome_deck: String,
    #[serde(default)]
    pub estrategia: Option<String>,
    #[serde(default)]
    pub cartas: Vec<DeckCard>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeckCard {
    pub id_carta: i64,
    #[serde(default)]
    pub quantidade: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(default)]
    pub nome: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(rename = "_id")]
    pub id: i64,
    #[serde(default)]
    pub cidade: Option<String>,
    #[serde(default)]
    pub estado: Option<String>,
}

/// The four collections, keyed by their collection names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    #[serde(rename = "Torneios", default)]
    pub tournaments: Vec<Tournament>,
    #[serde(rename = "Jogadores", default)]
    pub players: Vec<Player>,
    #[serde(rename = "Cartas", default)]
    pub cards: Vec<Card>,
    #[serde(rename = "Enderecos", default)]
    pub addresses: Vec<Address>,
}
