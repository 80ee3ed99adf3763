mod actions;
mod render;
mod terminal;

use std::collections::HashMap;
use std::io;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::TableState;

use crate::api::EpisodeClient;
use crate::config::Config;
use crate::episode::Episode;
use crate::player::{Player, ProcessOutput};
use crate::session::{PlaybackSession, SessionChange};

pub(crate) use self::actions::{
    apply_fetch_result, describe_change, describe_output_event, ensure_selected_detail,
    status_error, status_info,
};
use self::actions::request_latest;
#[cfg(test)]
pub(crate) use self::render::now_playing_text;
use self::render::draw_tui;
use self::terminal::TerminalGuard;

#[derive(Debug, Clone)]
pub(crate) enum FetchResult {
    Latest(Result<Vec<Episode>, String>),
    Detail {
        id: String,
        result: Result<Episode, String>,
    },
}

#[derive(Debug, Clone)]
pub(crate) enum ListState {
    Loading,
    Ready(Vec<Episode>),
    Failed(String),
}

impl ListState {
    pub(crate) fn episodes(&self) -> &[Episode] {
        match self {
            Self::Ready(episodes) => episodes.as_slice(),
            Self::Loading | Self::Failed(_) => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) enum DetailState {
    Loading,
    Ready(Episode),
    Failed(String),
}

#[derive(Debug)]
pub(crate) struct ViewState {
    pub(crate) list: ListState,
    pub(crate) table_state: TableState,
    pub(crate) details: HashMap<String, DetailState>,
    pub(crate) show_detail: bool,
    pub(crate) status: String,
}

impl ViewState {
    pub(crate) fn new() -> Self {
        Self {
            list: ListState::Loading,
            table_state: TableState::default(),
            details: HashMap::new(),
            show_detail: false,
            status: status_info("Loading latest episodes..."),
        }
    }

    pub(crate) fn selected_episode(&self) -> Option<&Episode> {
        self.table_state
            .selected()
            .and_then(|idx| self.list.episodes().get(idx))
    }

    /// Drops failed detail lookups so the next view of them fetches again.
    pub(crate) fn forget_failed_details(&mut self) {
        self.details
            .retain(|_, state| !matches!(state, DetailState::Failed(_)));
    }
}

pub(crate) fn run_tui(client: &EpisodeClient, config: &Config) -> Result<()> {
    let mut guard = TerminalGuard::enter()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))
        .context("failed to initialize terminal backend")?;
    terminal.clear()?;

    let (fetch_tx, fetch_rx) = mpsc::channel::<FetchResult>();
    let (change_tx, change_rx) = mpsc::channel::<SessionChange>();
    let mut player = Player::new(
        PlaybackSession::new(),
        ProcessOutput::new(config.player.clone()),
    );
    player.subscribe(move |_, change| {
        let _ = change_tx.send(change);
    });

    let mut view = ViewState::new();
    request_latest(client, config.list_limit, &fetch_tx);

    loop {
        while let Ok(result) = fetch_rx.try_recv() {
            apply_fetch_result(&mut view, result);
        }
        if view.show_detail {
            ensure_selected_detail(client, &mut view, &fetch_tx);
        }
        while let Ok(change) = change_rx.try_recv() {
            view.status = describe_change(player.session(), player.output_state(), change);
        }
        for event in player.pump() {
            view.status = describe_output_event(&event);
        }

        terminal.draw(|frame| draw_tui(frame, &mut view, &player))?;

        if !event::poll(Duration::from_millis(200))? {
            continue;
        }

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let episodes = view.list.episodes();
        match key.code {
            KeyCode::Char('q') => break,
            KeyCode::Up => {
                if let Some(selected) = view.table_state.selected() {
                    view.table_state.select(Some(selected.saturating_sub(1)));
                }
            }
            KeyCode::Down => {
                if let Some(selected) = view.table_state.selected()
                    && !episodes.is_empty()
                {
                    let next = (selected + 1).min(episodes.len() - 1);
                    view.table_state.select(Some(next));
                }
            }
            KeyCode::Enter => {
                let Some(selected) = view
                    .table_state
                    .selected()
                    .filter(|idx| *idx < episodes.len())
                else {
                    continue;
                };
                let queue = episodes.to_vec();
                if let Err(err) = player.play_from_queue(queue, selected) {
                    view.status = status_error(&format!("Play failed: {err}"));
                }
            }
            KeyCode::Char('p') => {
                if let Some(episode) = view.selected_episode().cloned() {
                    player.play_single(episode);
                }
            }
            KeyCode::Char('d') => view.show_detail = !view.show_detail,
            KeyCode::Char('r') => {
                view.list = ListState::Loading;
                view.forget_failed_details();
                view.status = status_info("Reloading latest episodes...");
                request_latest(client, config.list_limit, &fetch_tx);
            }
            KeyCode::Char(' ') | KeyCode::Char('n') | KeyCode::Char('b')
            | KeyCode::Char('l') | KeyCode::Char('s')
                if !player.session().has_episode() =>
            {
                view.status = status_info("Nothing playing. Select an episode and press Enter.");
            }
            KeyCode::Char(' ') => player.toggle_play(),
            KeyCode::Char('n') => player.next(),
            KeyCode::Char('b') => player.previous(),
            KeyCode::Char('l') => player.toggle_loop(),
            KeyCode::Char('s') => player.toggle_shuffle(),
            _ => {}
        }
    }

    terminal.show_cursor()?;
    guard.leave()?;
    Ok(())
}
