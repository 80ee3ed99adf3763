use chrono::{Locale, NaiveDate};

/// One podcast episode as delivered by the episodes API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Episode {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) members: String,
    pub(crate) thumbnail: String,
    /// HTML-formatted long description; empty for list entries.
    pub(crate) description: String,
    pub(crate) duration_seconds: u64,
    pub(crate) media_url: String,
    pub(crate) published_at: NaiveDate,
}

impl Episode {
    pub(crate) fn duration_display(&self) -> String {
        format_duration(self.duration_seconds)
    }

    pub(crate) fn published_display(&self) -> String {
        format_published_date(self.published_at)
    }
}

pub(crate) fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Short pt-BR date as shown on the site, e.g. `8 jan 21`.
pub(crate) fn format_published_date(date: NaiveDate) -> String {
    date.format_localized("%-d %b %y", Locale::pt_BR).to_string()
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}

#[cfg(test)]
pub(crate) fn sample_episode(id: &str) -> Episode {
    Episode {
        id: id.to_string(),
        title: format!("Episode {id}"),
        members: "Diego and Richard".to_string(),
        thumbnail: format!("https://cdn.example.test/{id}.jpg"),
        description: String::new(),
        duration_seconds: 3_981,
        media_url: format!("https://cdn.example.test/{id}.m4a"),
        published_at: NaiveDate::from_ymd_opt(2021, 1, 22).expect("valid date"),
    }
}
