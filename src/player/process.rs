use std::path::PathBuf;
use std::process::{Child, Command as ProcessCommand, Stdio};

use log::{debug, warn};

use super::{AudioOutput, OutputEvent};

/// External media player invocation; the media URL is appended last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PlayerCommand {
    pub(crate) bin: PathBuf,
    pub(crate) args: Vec<String>,
}

/// Audio output backed by an external player process per episode.
///
/// Pausing stops the process with job-control signals where available.
/// Looping is emulated by relaunching the same media when the process exits
/// cleanly, so toggling it takes effect at the next end of media.
#[derive(Debug)]
pub(crate) struct ProcessOutput {
    command: PlayerCommand,
    media_url: Option<String>,
    child: Option<Child>,
    paused: bool,
    looping: bool,
    events: Vec<OutputEvent>,
}

impl ProcessOutput {
    pub(crate) fn new(command: PlayerCommand) -> Self {
        Self {
            command,
            media_url: None,
            child: None,
            paused: false,
            looping: false,
            events: Vec::new(),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_running(&self) -> bool {
        self.child.is_some()
    }

    #[cfg(test)]
    pub(crate) fn is_paused(&self) -> bool {
        self.paused
    }

    fn spawn(&mut self) {
        let Some(url) = self.media_url.as_deref() else {
            return;
        };
        let mut cmd = ProcessCommand::new(&self.command.bin);
        cmd.args(&self.command.args)
            .arg(url)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        match cmd.spawn() {
            Ok(child) => {
                debug!(
                    "launched {} (pid {}) for {url}",
                    self.command.bin.display(),
                    child.id()
                );
                self.child = Some(child);
                self.paused = false;
            }
            Err(err) => {
                warn!("failed to launch {}: {err}", self.command.bin.display());
                self.events.push(OutputEvent::Failed(format!(
                    "failed to launch {}: {err}",
                    self.command.bin.display()
                )));
            }
        }
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        self.paused = false;
    }

    fn reap(&mut self) {
        let Some(child) = self.child.as_mut() else {
            return;
        };
        let status = match child.try_wait() {
            Ok(None) => return,
            Ok(Some(status)) => status,
            Err(err) => {
                self.child = None;
                self.events
                    .push(OutputEvent::Failed(format!("failed waiting on player: {err}")));
                return;
            }
        };

        self.child = None;
        if !status.success() {
            self.events.push(OutputEvent::Failed(format!(
                "{} exited with status: {status}",
                self.command.bin.display()
            )));
        } else if self.looping {
            debug!("end of media while looping, relaunching");
            self.spawn();
        } else {
            self.events.push(OutputEvent::Finished);
        }
    }
}

impl AudioOutput for ProcessOutput {
    fn load(&mut self, media_url: &str) {
        self.stop();
        self.media_url = Some(media_url.to_string());
    }

    fn play(&mut self) {
        match self.child.as_ref() {
            Some(child) if self.paused => match signal_child(child, Signal::Continue) {
                Ok(()) => self.paused = false,
                Err(err) => {
                    warn!("failed to resume player: {err}");
                    self.stop();
                    self.spawn();
                }
            },
            Some(_) => {}
            None => self.spawn(),
        }
    }

    fn pause(&mut self) {
        let Some(child) = self.child.as_ref() else {
            return;
        };
        if self.paused {
            return;
        }
        match signal_child(child, Signal::Stop) {
            Ok(()) => self.paused = true,
            Err(err) => {
                // Without job control the only way to go quiet is to stop;
                // the next play starts the media over.
                debug!("pause unavailable ({err}), stopping player");
                self.stop();
            }
        }
    }

    fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    fn poll_events(&mut self) -> Vec<OutputEvent> {
        self.reap();
        std::mem::take(&mut self.events)
    }
}

impl Drop for ProcessOutput {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Clone, Copy)]
enum Signal {
    Stop,
    Continue,
}

#[cfg(unix)]
fn signal_child(child: &Child, signal: Signal) -> std::io::Result<()> {
    let signum = match signal {
        Signal::Stop => libc::SIGSTOP,
        Signal::Continue => libc::SIGCONT,
    };
    let pid = child.id() as libc::pid_t;
    if unsafe { libc::kill(pid, signum) } == 0 {
        Ok(())
    } else {
        Err(std::io::Error::last_os_error())
    }
}

#[cfg(not(unix))]
fn signal_child(_child: &Child, signal: Signal) -> std::io::Result<()> {
    Err(std::io::Error::new(
        std::io::ErrorKind::Unsupported,
        format!("{signal:?} signal is not supported on this platform"),
    ))
}
