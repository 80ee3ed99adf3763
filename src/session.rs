//! Playback session state: the navigable episode queue, the position in it,
//! and the play/loop/shuffle flags.
//!
//! Index 0 of a queue is the newest episode, so "forward" (next) walks toward
//! lower indices and "backward" (previous) toward higher ones, wrapping at
//! both ends.

#[cfg(test)]
mod tests;

use std::fmt;

use log::debug;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;

use crate::episode::Episode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub(crate) enum SessionError {
    #[error("cannot play from an empty episode queue")]
    InvalidQueue,
    #[error("queue index {index} is out of range for {len} episode(s)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Which operation produced a session notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SessionChange {
    QueueReplaced,
    PlayToggled,
    LoopToggled,
    ShuffleToggled,
    Advanced,
}

type Listener = Box<dyn FnMut(&PlaybackSession, SessionChange)>;

pub(crate) struct PlaybackSession {
    queue: Vec<Episode>,
    // Some(i) with i < queue.len() exactly when the queue is non-empty.
    current_index: Option<usize>,
    is_playing: bool,
    is_looping: bool,
    is_shuffling: bool,
    rng: StdRng,
    listeners: Vec<Listener>,
}

impl PlaybackSession {
    pub(crate) fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub(crate) fn with_rng(rng: StdRng) -> Self {
        Self {
            queue: Vec::new(),
            current_index: None,
            is_playing: false,
            is_looping: false,
            is_shuffling: false,
            rng,
            listeners: Vec::new(),
        }
    }

    /// Registers a listener that runs after every successful mutation.
    pub(crate) fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&PlaybackSession, SessionChange) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub(crate) fn queue(&self) -> &[Episode] {
        &self.queue
    }

    pub(crate) fn current_index(&self) -> Option<usize> {
        self.current_index
    }

    pub(crate) fn current_episode(&self) -> Option<&Episode> {
        self.current_index.and_then(|idx| self.queue.get(idx))
    }

    pub(crate) fn has_episode(&self) -> bool {
        self.current_index.is_some()
    }

    pub(crate) fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub(crate) fn is_looping(&self) -> bool {
        self.is_looping
    }

    pub(crate) fn is_shuffling(&self) -> bool {
        self.is_shuffling
    }

    pub(crate) fn play_single(&mut self, episode: Episode) {
        debug!("playing single episode {}", episode.id);
        self.queue = vec![episode];
        self.current_index = Some(0);
        self.is_playing = true;
        self.notify(SessionChange::QueueReplaced);
    }

    pub(crate) fn play_from_queue(
        &mut self,
        episodes: Vec<Episode>,
        index: usize,
    ) -> Result<(), SessionError> {
        if episodes.is_empty() {
            return Err(SessionError::InvalidQueue);
        }
        if index >= episodes.len() {
            return Err(SessionError::IndexOutOfRange {
                index,
                len: episodes.len(),
            });
        }

        debug!(
            "playing from queue of {} episode(s) at index {index}",
            episodes.len()
        );
        self.queue = episodes;
        self.current_index = Some(index);
        self.is_playing = true;
        self.notify(SessionChange::QueueReplaced);
        Ok(())
    }

    /// Flips the playing flag. With nothing queued there is nothing to play,
    /// so the flag stays false and no listener runs.
    pub(crate) fn toggle_play(&mut self) {
        if self.queue.is_empty() {
            debug!("ignoring play toggle on empty queue");
            return;
        }
        self.is_playing = !self.is_playing;
        self.notify(SessionChange::PlayToggled);
    }

    pub(crate) fn toggle_loop(&mut self) {
        self.is_looping = !self.is_looping;
        self.notify(SessionChange::LoopToggled);
    }

    pub(crate) fn toggle_shuffle(&mut self) {
        self.is_shuffling = !self.is_shuffling;
        self.notify(SessionChange::ShuffleToggled);
    }

    /// "Next": a random pick while shuffling (the current index may come up
    /// again), otherwise one step toward index 0, wrapping to the last entry.
    pub(crate) fn advance_forward(&mut self) {
        let Some(current) = self.current_index else {
            return;
        };
        let len = self.queue.len();
        let next = if self.is_shuffling {
            self.rng.gen_range(0..len)
        } else if current == 0 {
            len - 1
        } else {
            current - 1
        };
        self.move_to(next);
    }

    /// "Previous": one step toward the end of the queue, wrapping to 0.
    /// Shuffle does not apply.
    pub(crate) fn advance_backward(&mut self) {
        let Some(current) = self.current_index else {
            return;
        };
        let next = if current + 1 == self.queue.len() {
            0
        } else {
            current + 1
        };
        self.move_to(next);
    }

    fn move_to(&mut self, index: usize) {
        debug!("advancing session to index {index}");
        self.current_index = Some(index);
        self.notify(SessionChange::Advanced);
    }

    fn notify(&mut self, change: SessionChange) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for listener in &mut listeners {
            listener(self, change);
        }
        self.listeners = listeners;
    }
}

impl Default for PlaybackSession {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PlaybackSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaybackSession")
            .field("queue_len", &self.queue.len())
            .field("current_index", &self.current_index)
            .field("is_playing", &self.is_playing)
            .field("is_looping", &self.is_looping)
            .field("is_shuffling", &self.is_shuffling)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
