use std::sync::mpsc;

use log::debug;

use crate::api::EpisodeClient;
use crate::player::{OutputEvent, OutputState};
use crate::session::{PlaybackSession, SessionChange};

use super::{DetailState, FetchResult, ListState, ViewState};

pub(crate) fn status_info(msg: &str) -> String {
    format!("INFO: {msg}")
}

pub(crate) fn status_error(msg: &str) -> String {
    format!("ERROR: {msg}")
}

pub(super) fn request_latest(client: &EpisodeClient, limit: usize, tx: &mpsc::Sender<FetchResult>) {
    let client = client.clone();
    let tx = tx.clone();
    std::thread::spawn(move || {
        let result = client.latest(limit).map_err(|err| format!("{err:#}"));
        let _ = tx.send(FetchResult::Latest(result));
    });
}

/// Starts a background fetch for the selected episode's details unless one
/// is cached or in flight. Returns whether a fetch was started.
pub(crate) fn ensure_selected_detail(
    client: &EpisodeClient,
    view: &mut ViewState,
    tx: &mpsc::Sender<FetchResult>,
) -> bool {
    let Some(id) = view.selected_episode().map(|episode| episode.id.clone()) else {
        return false;
    };
    if view.details.contains_key(&id) {
        return false;
    }

    debug!("fetching details for episode {id}");
    view.details.insert(id.clone(), DetailState::Loading);
    let client = client.clone();
    let tx = tx.clone();
    std::thread::spawn(move || {
        let result = client.episode(&id).map_err(|err| format!("{err:#}"));
        let _ = tx.send(FetchResult::Detail { id, result });
    });
    true
}

pub(crate) fn apply_fetch_result(view: &mut ViewState, result: FetchResult) {
    match result {
        FetchResult::Latest(Ok(episodes)) => {
            view.status = if episodes.is_empty() {
                status_info("No episodes published yet.")
            } else {
                status_info(&format!("Loaded {} episode(s).", episodes.len()))
            };
            let selected = match view.table_state.selected() {
                _ if episodes.is_empty() => None,
                Some(selected) => Some(selected.min(episodes.len() - 1)),
                None => Some(0),
            };
            view.table_state.select(selected);
            view.list = ListState::Ready(episodes);
        }
        FetchResult::Latest(Err(err)) => {
            view.status = status_error(&format!("Loading episodes failed: {err}"));
            view.table_state.select(None);
            view.list = ListState::Failed(err);
        }
        FetchResult::Detail { id, result } => {
            let state = match result {
                Ok(episode) => DetailState::Ready(episode),
                Err(err) => DetailState::Failed(err),
            };
            view.details.insert(id, state);
        }
    }
}

pub(crate) fn describe_change(
    session: &PlaybackSession,
    output: &OutputState,
    change: SessionChange,
) -> String {
    let title = session
        .current_episode()
        .map(|episode| episode.title.as_str())
        .unwrap_or("-");
    let on_off = |flag: bool| if flag { "on" } else { "off" };
    match change {
        // Landing on the episode that just ended does not reload it.
        SessionChange::Advanced if *output == OutputState::Finished => status_info(&format!(
            "Already finished: {title}. Press n or b for another episode."
        )),
        SessionChange::QueueReplaced | SessionChange::Advanced => {
            status_info(&format!("Now playing: {title}"))
        }
        SessionChange::PlayToggled if session.is_playing() => {
            status_info(&format!("Resumed: {title}"))
        }
        SessionChange::PlayToggled => status_info(&format!("Paused: {title}")),
        SessionChange::LoopToggled => {
            status_info(&format!("Loop {}.", on_off(session.is_looping())))
        }
        SessionChange::ShuffleToggled => {
            status_info(&format!("Shuffle {}.", on_off(session.is_shuffling())))
        }
    }
}

pub(crate) fn describe_output_event(event: &OutputEvent) -> String {
    match event {
        OutputEvent::Finished => {
            status_info("Episode finished. Press n or b to move to another episode.")
        }
        OutputEvent::Failed(reason) => status_error(&format!("Audio output failed: {reason}")),
    }
}
