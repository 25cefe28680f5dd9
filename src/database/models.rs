/// Optional filters of `/api/tournaments`; both must match when present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TournamentFilter {
    pub cidade: Option<String>,
    pub formato: Option<String>,
}

impl TournamentFilter {
    /// Empty strings count as "no filter".
    pub fn new(cidade: Option<String>, formato: Option<String>) -> Self {
        Self {
            cidade: cidade.filter(|c| !c.is_empty()),
            formato: formato.filter(|f| !f.is_empty()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerFilter {
    /// Case-insensitive substring of the player name, matched literally.
    pub name_contains: Option<String>,
}

impl PlayerFilter {
    pub fn new(nome: Option<String>) -> Self {
        let name_contains = nome
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Self { name_contains }
    }
}
