//! Background write queue.
//!
//! Persistence writes are fire-and-forget commands executed in
//! submission order on one dedicated thread. Because there is a single
//! consumer, writes to the same key can never interleave, so
//! read-modify-write updates such as favorite usage counts are never
//! lost. Failures are logged and dropped; they never reach the caller.
//!
//! Dropping the queue stops accepting commands, drains what is already
//! queued, and joins the thread.

use std::sync::Arc;
use std::sync::mpsc::{self, Sender};
use std::thread::{self, JoinHandle};

use tessera_canvas::Color;

use crate::colors::ColorHistory;
use crate::error::StoreError;
use crate::progress::{ProgressRecord, ProgressStore};

/// One persistence write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCommand {
    /// Create or replace a progress record.
    SaveProgress(ProgressRecord),
    /// Forget the progress of an artwork.
    RemoveProgress(String),
    /// Log a color use.
    RecordRecent {
        /// The color used.
        color: Color,
        /// Artwork it was used on.
        artwork_id: Option<String>,
    },
    /// Add or bump a favorite.
    AddFavorite(Color),
    /// Remove a favorite.
    RemoveFavorite(Color),
    /// Empty the recent-color log.
    ClearRecents,
}

/// Stores the write queue applies commands to.
#[derive(Clone)]
pub struct WriteTargets {
    /// Destination of progress commands.
    pub progress: Arc<dyn ProgressStore>,
    /// Destination of favorite and recent commands.
    pub colors: Arc<dyn ColorHistory>,
}

impl WriteTargets {
    fn apply(&self, command: &WriteCommand) -> Result<(), StoreError> {
        match command {
            WriteCommand::SaveProgress(record) => self.progress.save(record),
            WriteCommand::RemoveProgress(id) => self.progress.remove(id).map(drop),
            WriteCommand::RecordRecent { color, artwork_id } => {
                self.colors.record_recent(*color, artwork_id.as_deref())
            }
            WriteCommand::AddFavorite(color) => self.colors.add_favorite(*color).map(drop),
            WriteCommand::RemoveFavorite(color) => self.colors.remove_favorite(*color).map(drop),
            WriteCommand::ClearRecents => self.colors.clear_recents(),
        }
    }
}

enum Message {
    Write(WriteCommand),
    Flush(Sender<()>),
}

/// Single-threaded FIFO executor for [`WriteCommand`]s.
pub struct WriteQueue {
    sender: Option<Sender<Message>>,
    handle: Option<JoinHandle<()>>,
}

impl WriteQueue {
    /// Start the writer thread.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the thread cannot be spawned.
    pub fn spawn(targets: WriteTargets) -> Result<Self, StoreError> {
        let (sender, receiver) = mpsc::channel::<Message>();
        let handle = thread::Builder::new()
            .name("tessera-writer".into())
            .spawn(move || {
                for message in receiver {
                    match message {
                        Message::Write(command) => {
                            if let Err(e) = targets.apply(&command) {
                                log::warn!("write {command:?} failed: {e}");
                            }
                        }
                        Message::Flush(ack) => {
                            ack.send(()).ok();
                        }
                    }
                }
                log::debug!("write queue drained");
            })?;
        Ok(Self {
            sender: Some(sender),
            handle: Some(handle),
        })
    }

    /// Queue `command`. Never blocks.
    pub fn submit(&self, command: WriteCommand) {
        let Some(sender) = &self.sender else {
            return;
        };
        if let Err(mpsc::SendError(Message::Write(command))) = sender.send(Message::Write(command))
        {
            log::warn!("write queue stopped, dropping {command:?}");
        }
    }

    /// Block until every command submitted so far has been applied.
    pub fn flush(&self) {
        let Some(sender) = &self.sender else {
            return;
        };
        let (ack, done) = mpsc::channel();
        if sender.send(Message::Flush(ack)).is_ok() {
            done.recv().ok();
        }
    }
}

impl Drop for WriteQueue {
    fn drop(&mut self) {
        // Closing the channel ends the thread's loop once the backlog is done.
        drop(self.sender.take());
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::error!("write queue thread panicked");
        }
    }
}
