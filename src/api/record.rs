use anyhow::{Result, anyhow};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer};

use crate::episode::Episode;

/// Episode as served by the API, before normalisation.
#[derive(Debug, Deserialize)]
pub(crate) struct EpisodeRecord {
    #[serde(deserialize_with = "opaque_id")]
    pub(crate) id: String,
    pub(crate) title: String,
    #[serde(default)]
    pub(crate) members: String,
    #[serde(default)]
    pub(crate) thumbnail: String,
    #[serde(default)]
    pub(crate) description: String,
    pub(crate) published_at: String,
    pub(crate) file: FileRecord,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FileRecord {
    pub(crate) url: String,
    #[serde(deserialize_with = "duration_seconds")]
    pub(crate) duration: u64,
}

impl EpisodeRecord {
    pub(crate) fn into_episode(self) -> Result<Episode> {
        let published_at = parse_published_at(&self.published_at).ok_or_else(|| {
            anyhow!(
                "episode {} has unrecognized published_at {:?}",
                self.id,
                self.published_at
            )
        })?;
        Ok(Episode {
            id: self.id,
            title: self.title,
            members: self.members,
            thumbnail: self.thumbnail,
            description: self.description,
            duration_seconds: self.file.duration,
            media_url: self.file.url,
            published_at,
        })
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Unsigned(u64),
    Float(f64),
}

fn opaque_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Text(text) if !text.trim().is_empty() => Ok(text),
        StringOrNumber::Text(_) => Err(D::Error::custom("episode id is empty")),
        StringOrNumber::Unsigned(value) => Ok(value.to_string()),
        StringOrNumber::Float(value) => Ok(value.to_string()),
    }
}

fn duration_seconds<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let parsed = match StringOrNumber::deserialize(deserializer)? {
        StringOrNumber::Unsigned(value) => Some(value),
        StringOrNumber::Float(value) => whole_seconds(value),
        StringOrNumber::Text(text) => parse_duration_text(&text),
    };
    parsed.ok_or_else(|| D::Error::custom("duration is not a non-negative number of seconds"))
}

pub(crate) fn parse_duration_text(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<u64>() {
        return Some(value);
    }
    trimmed.parse::<f64>().ok().and_then(whole_seconds)
}

fn whole_seconds(value: f64) -> Option<u64> {
    (value.is_finite() && value >= 0.0).then(|| value.floor() as u64)
}

pub(crate) fn parse_published_at(raw: &str) -> Option<NaiveDate> {
    let trimmed = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").ok()
}
