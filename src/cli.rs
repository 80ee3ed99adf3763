use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "podcastr",
    version,
    about = "Browse and listen to podcastr episodes from the terminal"
)]
pub struct Cli {
    /// Episodes API base URL (overrides PODCASTR_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Media player binary used for audio output (overrides PODCASTR_PLAYER_BIN)
    #[arg(long, global = true)]
    pub player: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the latest episodes, newest first
    List {
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print one episode with its full description
    Show { id: String },
    /// Play one episode until it ends
    Play { id: String },
    /// Interactive browser with a persistent player (default)
    Tui {
        #[arg(long)]
        limit: Option<usize>,
    },
}

impl Cli {
    pub fn limit(&self) -> Option<usize> {
        match &self.command {
            Some(Command::List { limit }) | Some(Command::Tui { limit }) => *limit,
            _ => None,
        }
    }
}
