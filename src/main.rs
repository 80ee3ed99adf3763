mod api;
mod app;
mod cli;
mod config;
mod episode;
mod http;
mod player;
mod session;

#[cfg(test)]
mod test_support;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    pretty_env_logger::init();
    let cli = cli::Cli::parse();
    app::run(cli)
}
