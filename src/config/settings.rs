use std::path::PathBuf;

pub const DEFAULT_DATABASE_NAME: &str = "MTG_DB";
pub const DEFAULT_STATIC_DIR: &str = "public";

#[derive(Debug, Clone, PartialEq)]
pub struct DatabaseSettings {
    /// `MONGODB_URI`; absence is reported when the first query needs a connection.
    pub uri: Option<String>,
    pub name: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            uri: None,
            name: DEFAULT_DATABASE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub database: DatabaseSettings,
    pub static_dir: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseSettings::default(),
            static_dir: PathBuf::from(DEFAULT_STATIC_DIR),
        }
    }
}

impl AppConfig {
    /// Reads settings from the process environment.
    pub fn new() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            database: DatabaseSettings {
                uri: non_empty("MONGODB_URI"),
                name: non_empty("MONGODB_DB").unwrap_or_else(|| DEFAULT_DATABASE_NAME.to_string()),
            },
            static_dir: non_empty("STATIC_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR)),
        }
    }
}
