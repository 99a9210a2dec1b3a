//! Best-effort presence reporting
//!
//! Announces the active page title to an external status service. The shell
//! only emits intents over a channel; a detached worker thread owns the sink
//! and absorbs every failure. Nothing in the application awaits the
//! reporter, and a dead or absent presence service costs one log line per
//! update.

pub mod discord;

use m365_core::M365Result;
use std::sync::mpsc;
use std::thread;

pub use discord::DiscordSink;

/// Intent emitted by the shell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceUpdate {
    /// Announce the given activity text (e.g. `On "Inbox - Outlook"`)
    Activity(String),
    /// Clear any announced activity
    Clear,
}

/// Destination for presence updates
pub trait PresenceSink: Send {
    fn set_activity(&mut self, text: &str) -> M365Result<()>;
    fn clear(&mut self) -> M365Result<()>;
}

/// Handle for emitting presence intents.
///
/// Cloneable; dropping the last handle shuts the worker down. Sending never
/// blocks and never fails the caller.
#[derive(Clone)]
pub struct PresenceReporter {
    tx: mpsc::Sender<PresenceUpdate>,
}

impl PresenceReporter {
    /// Spawn the worker thread around the given sink
    pub fn spawn(sink: Box<dyn PresenceSink>) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("presence".to_string())
            .spawn(move || worker(sink, rx))
            .map(|_| ())
            .unwrap_or_else(|e| log::error!("Failed to spawn presence worker: {}", e));
        Self { tx }
    }

    /// Spawn a reporter backed by the local Discord client
    pub fn spawn_discord() -> Self {
        Self::spawn(Box::new(DiscordSink::new()))
    }

    /// Announce activity text; failures are the worker's problem
    pub fn activity(&self, text: impl Into<String>) {
        self.send(PresenceUpdate::Activity(text.into()));
    }

    /// Announce which page title is currently shown
    pub fn page_title(&self, title: &str) {
        self.activity(format!("On \"{}\"", title));
    }

    /// Clear the announced activity
    pub fn clear(&self) {
        self.send(PresenceUpdate::Clear);
    }

    fn send(&self, update: PresenceUpdate) {
        if self.tx.send(update).is_err() {
            log::debug!("Presence worker is gone, dropping update");
        }
    }
}

fn worker(mut sink: Box<dyn PresenceSink>, rx: mpsc::Receiver<PresenceUpdate>) {
    log::info!("Presence worker started");
    while let Ok(update) = rx.recv() {
        let result = match &update {
            PresenceUpdate::Activity(text) => sink.set_activity(text),
            PresenceUpdate::Clear => sink.clear(),
        };
        if let Err(e) = result {
            log::warn!("Presence update failed: {}", e);
        }
    }
    log::info!("Presence worker stopped");
}
