use std::env;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::cli::Cli;
use crate::player::PlayerCommand;

pub(crate) const API_URL_ENV: &str = "PODCASTR_API_URL";
pub(crate) const PLAYER_BIN_ENV: &str = "PODCASTR_PLAYER_BIN";
pub(crate) const PLAYER_ARGS_ENV: &str = "PODCASTR_PLAYER_ARGS";
pub(crate) const LIST_LIMIT_ENV: &str = "PODCASTR_LIST_LIMIT";

const DEFAULT_API_URL: &str = "http://localhost:3333";
const DEFAULT_PLAYER_BIN: &str = "mpv";
const DEFAULT_PLAYER_ARGS: &str = "--no-video --really-quiet";
const DEFAULT_LIST_LIMIT: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) api_url: String,
    pub(crate) player: PlayerCommand,
    pub(crate) list_limit: usize,
}

impl Config {
    /// Command-line flags win over the environment, which wins over defaults.
    pub(crate) fn resolve(cli: &Cli) -> Self {
        let api_url = cli
            .api_url
            .clone()
            .unwrap_or_else(|| api_url_from_env(env::var_os(API_URL_ENV)));
        let bin = cli
            .player
            .clone()
            .unwrap_or_else(|| player_bin_from_env(env::var_os(PLAYER_BIN_ENV)));
        let list_limit = cli
            .limit()
            .unwrap_or_else(|| list_limit_from_env(env::var_os(LIST_LIMIT_ENV)))
            .max(1);

        Self {
            api_url,
            player: PlayerCommand {
                bin,
                args: player_args_from_env(env::var_os(PLAYER_ARGS_ENV)),
            },
            list_limit,
        }
    }
}

pub(crate) fn api_url_from_env(env_value: Option<OsString>) -> String {
    env_value
        .and_then(|value| value.into_string().ok())
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string())
}

pub(crate) fn player_bin_from_env(env_value: Option<OsString>) -> PathBuf {
    match env_value {
        Some(value) if !value.is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_PLAYER_BIN),
    }
}

pub(crate) fn player_args_from_env(env_value: Option<OsString>) -> Vec<String> {
    let raw = match env_value.and_then(|value| value.into_string().ok()) {
        Some(value) => value,
        None => DEFAULT_PLAYER_ARGS.to_string(),
    };
    raw.split_whitespace().map(str::to_string).collect()
}

pub(crate) fn list_limit_from_env(env_value: Option<OsString>) -> usize {
    env_value
        .and_then(|value| value.into_string().ok())
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_LIST_LIMIT)
}
