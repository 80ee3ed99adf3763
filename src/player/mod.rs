mod process;


use log::{info, warn};

use crate::episode::Episode;
use crate::session::{PlaybackSession, SessionChange, SessionError};

pub(crate) use process::{PlayerCommand, ProcessOutput};

/// Something that can actually make sound. Every call is a fire-and-forget
/// instruction; failures come back through [`AudioOutput::poll_events`].
pub(crate) trait AudioOutput {
    fn load(&mut self, media_url: &str);
    fn play(&mut self);
    fn pause(&mut self);
    fn set_looping(&mut self, looping: bool);
    fn poll_events(&mut self) -> Vec<OutputEvent>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum OutputEvent {
    /// Media reached its end while looping was off.
    Finished,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum OutputState {
    #[default]
    Idle,
    Active,
    Finished,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Loaded {
    index: usize,
    media_url: String,
}

/// Owns the playback session and keeps an output in step with it.
pub(crate) struct Player<O: AudioOutput> {
    session: PlaybackSession,
    output: O,
    loaded: Option<Loaded>,
    output_playing: bool,
    output_looping: bool,
    state: OutputState,
}

impl<O: AudioOutput> Player<O> {
    pub(crate) fn new(session: PlaybackSession, output: O) -> Self {
        Self {
            session,
            output,
            loaded: None,
            output_playing: false,
            output_looping: false,
            state: OutputState::Idle,
        }
    }

    pub(crate) fn session(&self) -> &PlaybackSession {
        &self.session
    }

    #[cfg(test)]
    pub(crate) fn output(&self) -> &O {
        &self.output
    }

    pub(crate) fn output_state(&self) -> &OutputState {
        &self.state
    }

    pub(crate) fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&PlaybackSession, SessionChange) + 'static,
    {
        self.session.subscribe(listener);
    }

    pub(crate) fn play_single(&mut self, episode: Episode) {
        self.session.play_single(episode);
        self.loaded = None;
        self.sync();
    }

    pub(crate) fn play_from_queue(
        &mut self,
        episodes: Vec<Episode>,
        index: usize,
    ) -> Result<(), SessionError> {
        self.session.play_from_queue(episodes, index)?;
        self.loaded = None;
        self.sync();
        Ok(())
    }

    pub(crate) fn toggle_play(&mut self) {
        self.session.toggle_play();
        self.sync();
    }

    pub(crate) fn toggle_loop(&mut self) {
        self.session.toggle_loop();
        self.sync();
    }

    pub(crate) fn toggle_shuffle(&mut self) {
        self.session.toggle_shuffle();
    }

    pub(crate) fn next(&mut self) {
        self.session.advance_forward();
        self.sync();
    }

    pub(crate) fn previous(&mut self) {
        self.session.advance_backward();
        self.sync();
    }

    /// Collects output events. Natural completion leaves the session as it
    /// is: nothing advances to another episode on its own.
    pub(crate) fn pump(&mut self) -> Vec<OutputEvent> {
        let events = self.output.poll_events();
        for event in &events {
            match event {
                OutputEvent::Finished => {
                    info!("playback reached end of media");
                    self.state = OutputState::Finished;
                }
                OutputEvent::Failed(reason) => {
                    warn!("audio output failed: {reason}");
                    self.state = OutputState::Failed(reason.clone());
                }
            }
        }
        events
    }

    fn sync(&mut self) {
        if self.output_looping != self.session.is_looping() {
            self.output_looping = self.session.is_looping();
            self.output.set_looping(self.output_looping);
        }

        let (Some(index), Some(episode)) =
            (self.session.current_index(), self.session.current_episode())
        else {
            return;
        };
        let wanted = Loaded {
            index,
            media_url: episode.media_url.clone(),
        };
        if self.loaded.as_ref() != Some(&wanted) {
            self.output.load(&wanted.media_url);
            self.loaded = Some(wanted);
            self.output_playing = false;
            self.state = OutputState::Idle;
        }

        match (self.session.is_playing(), self.output_playing) {
            (true, false) => {
                self.output.play();
                self.output_playing = true;
                self.state = OutputState::Active;
            }
            (false, true) => {
                self.output.pause();
                self.output_playing = false;
            }
            _ => {}
        }
    }
}
