mod record;


use anyhow::{Context, Result, bail};
use log::{debug, warn};
use serde_json::Value;

use crate::episode::Episode;
use crate::http::HttpClient;

use self::record::EpisodeRecord;

/// Client for the `/episodes` REST resource.
#[derive(Debug, Clone)]
pub(crate) struct EpisodeClient {
    base_url: String,
    http: HttpClient,
}

impl EpisodeClient {
    pub(crate) fn new(base_url: &str, http: HttpClient) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            http,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Newest-first page of episodes; index 0 is the most recent.
    pub(crate) fn latest(&self, limit: usize) -> Result<Vec<Episode>> {
        let url = format!("{}/episodes", self.base_url);
        let query = [
            ("_limit", limit.to_string()),
            ("_sort", "published_at".to_string()),
            ("_order", "desc".to_string()),
        ];
        let body = self
            .http
            .get_text(&url, &query)
            .with_context(|| format!("failed to fetch latest episodes from {url}"))?;
        let outcome = parse_episode_list(&body)?;
        for warning in &outcome.warnings {
            warn!("{warning}");
        }
        debug!("fetched {} episode(s)", outcome.episodes.len());
        Ok(outcome.episodes)
    }

    pub(crate) fn episode(&self, id: &str) -> Result<Episode> {
        let id = id.trim();
        if id.is_empty() || id.contains(['/', '?', '#']) || id.contains(char::is_whitespace) {
            bail!("invalid episode id {id:?}");
        }
        let url = format!("{}/episodes/{id}", self.base_url);
        let body = self
            .http
            .get_text(&url, &[])
            .with_context(|| format!("failed to fetch episode {id} from {url}"))?;
        parse_episode(&body).with_context(|| format!("malformed record for episode {id}"))
    }
}

#[derive(Debug, Default)]
pub(crate) struct EpisodeListOutcome {
    pub(crate) episodes: Vec<Episode>,
    pub(crate) warnings: Vec<String>,
}

/// Parses a list response, skipping records that do not decode.
pub(crate) fn parse_episode_list(raw: &str) -> Result<EpisodeListOutcome> {
    let values: Vec<Value> =
        serde_json::from_str(raw).context("episode list response is not a JSON array")?;

    let mut outcome = EpisodeListOutcome::default();
    for (position, value) in values.into_iter().enumerate() {
        let decoded = serde_json::from_value::<EpisodeRecord>(value)
            .map_err(anyhow::Error::from)
            .and_then(EpisodeRecord::into_episode);
        match decoded {
            Ok(episode) => outcome.episodes.push(episode),
            Err(err) => outcome
                .warnings
                .push(format!("skipped episode record #{position}: {err}")),
        }
    }
    Ok(outcome)
}

pub(crate) fn parse_episode(raw: &str) -> Result<Episode> {
    let record: EpisodeRecord = serde_json::from_str(raw)?;
    record.into_episode()
}
