mod tui;


use std::thread;
use std::time::Duration;

use anyhow::{Result, anyhow};
use log::info;

use crate::api::EpisodeClient;
use crate::cli::{Cli, Command};
use crate::config::Config;
use crate::episode::{Episode, truncate};
use crate::http::HttpClient;
use crate::player::{OutputEvent, Player, ProcessOutput};
use crate::session::PlaybackSession;

pub fn run(cli: Cli) -> Result<()> {
    let config = Config::resolve(&cli);
    info!("using episodes API at {}", config.api_url);
    let client = EpisodeClient::new(&config.api_url, HttpClient::default());

    match cli.command {
        Some(Command::List { .. }) => run_list(&client, config.list_limit)?,
        Some(Command::Show { id }) => run_show(&client, &id)?,
        Some(Command::Play { id }) => run_play(&client, &config, &id)?,
        Some(Command::Tui { .. }) | None => tui::run_tui(&client, &config)?,
    }

    Ok(())
}

fn run_list(client: &EpisodeClient, limit: usize) -> Result<()> {
    let episodes = client.latest(limit)?;
    if episodes.is_empty() {
        println!("No episodes published yet at {}.", client.base_url());
        return Ok(());
    }

    println!("{:<48} {:<32} {:<10} {:<8}", "TITLE", "MEMBERS", "DATE", "DURATION");
    for episode in &episodes {
        println!("{}", list_line(episode));
    }
    Ok(())
}

fn run_show(client: &EpisodeClient, id: &str) -> Result<()> {
    let episode = client.episode(id)?;
    print!("{}", episode_page(&episode));
    Ok(())
}

fn run_play(client: &EpisodeClient, config: &Config, id: &str) -> Result<()> {
    let episode = client.episode(id)?;
    println!("Playing: {}", episode.title);
    println!("  {} | {}", episode.members, episode.duration_display());

    let mut player = Player::new(
        PlaybackSession::new(),
        ProcessOutput::new(config.player.clone()),
    );
    player.play_single(episode);

    loop {
        for event in player.pump() {
            match event {
                OutputEvent::Finished => {
                    println!("Finished.");
                    return Ok(());
                }
                OutputEvent::Failed(reason) => return Err(anyhow!("playback failed: {reason}")),
            }
        }
        thread::sleep(Duration::from_millis(250));
    }
}

pub(crate) fn list_line(episode: &Episode) -> String {
    format!(
        "{:<48} {:<32} {:<10} {:<8}",
        truncate(&episode.title, 48),
        truncate(&episode.members, 32),
        episode.published_display(),
        episode.duration_display()
    )
}

/// Full episode page. The description is trusted HTML and is printed as is.
pub(crate) fn episode_page(episode: &Episode) -> String {
    format!(
        "{}\n{}\n{} | {}\n\nThumbnail: {}\nAudio:     {}\n\n{}\n",
        episode.title,
        episode.members,
        episode.published_display(),
        episode.duration_display(),
        episode.thumbnail,
        episode.media_url,
        episode.description
    )
}
