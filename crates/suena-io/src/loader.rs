//! Sound file loading, synchronous and asynchronous.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use suena_core::{AudioContext, SoundFile};

use crate::wav::read_wav;
use crate::{Error, Result};

/// Creates [`SoundFile`] nodes from WAV files on disk.
///
/// The synchronous path decodes in place and returns a ready node. The
/// asynchronous path returns the node immediately, still unloaded, and
/// installs the buffer from a background thread; until then playback and
/// metadata queries report
/// [`NotReady`](suena_core::Error::NotReady). A preload counter tracks
/// decodes in flight, so a host can hold off until everything is audible.
pub struct Loader {
    ctx: AudioContext,
    pending: Arc<AtomicUsize>,
}

impl Loader {
    /// Creates a loader producing nodes in `ctx`.
    pub fn new(ctx: &AudioContext) -> Self {
        Self {
            ctx: ctx.clone(),
            pending: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of asynchronous loads still in flight.
    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }

    /// Decodes `path` synchronously and returns a ready node.
    pub fn load<P: Into<PathBuf>>(&self, path: P) -> Result<SoundFile> {
        let buffer = read_wav(path.into())?;
        Ok(SoundFile::from_buffer(&self.ctx, buffer))
    }

    /// Returns an unloaded node immediately and decodes `path` on a
    /// background thread.
    ///
    /// On completion the buffer is installed, the pending counter drops by
    /// exactly one (success or failure), and `on_loaded` fires with the
    /// outcome. Decode failures are also logged.
    pub fn load_async<P, F>(&self, path: P, on_loaded: F) -> SoundFile
    where
        P: Into<PathBuf>,
        F: FnOnce(Result<()>) + Send + 'static,
    {
        let path = path.into();
        let file = SoundFile::unloaded(&self.ctx);
        let slot = file.slot();
        let pending = Arc::clone(&self.pending);
        pending.fetch_add(1, Ordering::SeqCst);

        thread::spawn(move || {
            let result = read_wav(&path)
                .and_then(|buffer| slot.install(buffer).map_err(Error::from));
            if let Err(err) = &result {
                tracing::warn!("failed to load {}: {err}", path.display());
            }
            pending.fetch_sub(1, Ordering::SeqCst);
            on_loaded(result);
        });

        file
    }
}
