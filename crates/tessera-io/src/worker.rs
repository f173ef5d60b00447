//! Background asset loading.
//!
//! [`AssetLoader`] decodes segmentation assets on a dedicated thread so
//! the paint loop never blocks on I/O or JSON parsing. Every request is
//! tagged with a generation number; only the result of the most recent
//! request is ever handed back, so quickly switching artworks can never
//! install a stale one.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tessera_canvas::Artwork;

use crate::assets::{AssetStore, load_artwork};
use crate::error::StoreError;
use crate::progress::{ProgressRecord, ProgressStore};

/// Outcome of one load request.
#[derive(Debug, Clone)]
pub struct LoadResult {
    /// Generation of the request this answers.
    pub generation: u64,
    /// Asset name that was requested.
    pub name: String,
    /// The decoded artwork, or `None` if it could not be loaded.
    ///
    /// Artwork without an embedded id is given the asset name as id.
    pub artwork: Option<Artwork>,
    /// Previously saved progress for the artwork, if any.
    pub saved: Option<ProgressRecord>,
}

struct Request {
    generation: u64,
    name: String,
}

/// Loads artwork off-thread with last-requested-wins semantics.
pub struct AssetLoader {
    requests: Option<Sender<Request>>,
    results: Receiver<LoadResult>,
    generation: u64,
    handle: Option<JoinHandle<()>>,
}

impl AssetLoader {
    /// Start the loader thread.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the thread cannot be spawned.
    pub fn spawn(
        assets: Arc<dyn AssetStore>,
        progress: Arc<dyn ProgressStore>,
    ) -> Result<Self, StoreError> {
        let (requests, inbox) = mpsc::channel::<Request>();
        let (outbox, results) = mpsc::channel::<LoadResult>();
        let handle = thread::Builder::new()
            .name("tessera-loader".into())
            .spawn(move || {
                while let Ok(mut request) = inbox.recv() {
                    // Skip anything already superseded.
                    while let Ok(newer) = inbox.try_recv() {
                        request = newer;
                    }
                    let result = load(assets.as_ref(), progress.as_ref(), request);
                    if outbox.send(result).is_err() {
                        break;
                    }
                }
            })?;
        Ok(Self {
            requests: Some(requests),
            results,
            generation: 0,
            handle: Some(handle),
        })
    }

    /// Ask for asset `name`. Supersedes every earlier request.
    ///
    /// Returns the generation assigned to this request.
    pub fn request(&mut self, name: &str) -> u64 {
        self.generation += 1;
        let request = Request {
            generation: self.generation,
            name: name.to_owned(),
        };
        if let Some(requests) = &self.requests
            && requests.send(request).is_err()
        {
            log::warn!("asset loader stopped, dropping request for {name:?}");
        }
        self.generation
    }

    /// Generation of the most recent request (0 before the first).
    #[must_use]
    pub const fn latest_generation(&self) -> u64 {
        self.generation
    }

    /// Take the result of the latest request if it has arrived.
    ///
    /// Stale results found along the way are discarded.
    pub fn poll(&self) -> Option<LoadResult> {
        let mut current = None;
        loop {
            match self.results.try_recv() {
                Ok(result) => {
                    if let Some(fresh) = self.accept(result) {
                        current = Some(fresh);
                    }
                }
                Err(TryRecvError::Empty | TryRecvError::Disconnected) => return current,
            }
        }
    }

    /// Block until the latest request is answered or `timeout` elapses.
    pub fn wait(&self, timeout: Duration) -> Option<LoadResult> {
        let deadline = web_time::Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(web_time::Instant::now());
            match self.results.recv_timeout(remaining) {
                Ok(result) => {
                    if let Some(fresh) = self.accept(result) {
                        return Some(fresh);
                    }
                }
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return None,
            }
        }
    }

    fn accept(&self, result: LoadResult) -> Option<LoadResult> {
        if result.generation == self.generation {
            Some(result)
        } else {
            log::debug!(
                "discarding stale load of {:?} (generation {}, latest {})",
                result.name,
                result.generation,
                self.generation
            );
            None
        }
    }
}

impl Drop for AssetLoader {
    fn drop(&mut self) {
        drop(self.requests.take());
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            log::error!("asset loader thread panicked");
        }
    }
}

fn load(assets: &dyn AssetStore, progress: &dyn ProgressStore, request: Request) -> LoadResult {
    let artwork = load_artwork(assets, &request.name).map(|artwork| {
        if artwork.id().is_some() {
            artwork
        } else {
            artwork.with_id(request.name.clone())
        }
    });
    let saved = artwork
        .as_ref()
        .and_then(Artwork::id)
        .and_then(|id| match progress.load(id) {
            Ok(saved) => saved,
            Err(e) => {
                log::warn!("failed to read saved progress for {id:?}: {e}");
                None
            }
        });
    LoadResult {
        generation: request.generation,
        name: request.name,
        artwork,
        saved,
    }
}
