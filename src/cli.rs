use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(author, version, about = "tournament statistics dashboard backend")]
pub struct Cli {
    /// Command
    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// Start the API server
    Serve {
        /// Port number (optional, defaults to 3000)
        #[arg(short, long, env = "PORT", default_value_t = 3000)]
        port: u16,
        /// Serve from a JSON dump of the collections instead of MongoDB
        #[arg(long, env = "FIXTURES_PATH")]
        fixtures: Option<PathBuf>,
    },
}
