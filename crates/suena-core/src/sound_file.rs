//! Sound file playback node.

use std::sync::Arc;

use crate::buffer::AudioBuffer;
use crate::context::AudioContext;
use crate::control::Transport;
use crate::error::{Error, Result};
use crate::graph::NodeHandle;
use crate::node::AudioNode;
use crate::sampler::{PlayerState, SamplerVoice};

/// A buffer-backed playback node.
///
/// Created either from an already-decoded [`AudioBuffer`] or unloaded, with
/// the buffer arriving later through a [`BufferSlot`] (the asynchronous load
/// path). The node is wired to the destination on creation; transport,
/// rate, gain, and loop changes take effect at the next rendered block.
///
/// Dropping the node removes it from the graph.
pub struct SoundFile {
    ctx: AudioContext,
    handle: NodeHandle,
    state: Arc<PlayerState>,
}

impl SoundFile {
    /// Creates a node over an already-decoded buffer, ready to play.
    pub fn from_buffer(ctx: &AudioContext, buffer: AudioBuffer) -> Self {
        let file = Self::unloaded(ctx);
        // Fresh state, first install: cannot already hold a buffer.
        let _ = file.state.install_buffer(Arc::new(buffer));
        file
    }

    /// Creates a node with no buffer yet.
    ///
    /// Playback and metadata queries return [`Error::NotReady`] until a
    /// buffer is installed through [`slot()`](Self::slot).
    pub fn unloaded(ctx: &AudioContext) -> Self {
        let state = Arc::new(PlayerState::new());
        let voice = SamplerVoice::new(Arc::clone(&state), ctx.sample_rate());
        let handle = ctx.graph().add_source(Box::new(voice));
        ctx.register_player(&state);
        Self {
            ctx: ctx.clone(),
            handle,
            state,
        }
    }

    /// A sendable handle for installing the decoded buffer later.
    pub fn slot(&self) -> BufferSlot {
        BufferSlot {
            state: Arc::clone(&self.state),
        }
    }

    // --- Transport ---

    /// Begins or resumes playback at the stored rate.
    ///
    /// After [`pause()`](Self::pause) this resumes from the frozen position;
    /// after [`stop()`](Self::stop) or a natural end it starts from the
    /// beginning. Fails with [`Error::NotReady`] until the buffer is loaded.
    pub fn play(&self) -> Result<()> {
        self.state.buffer().ok_or(Error::NotReady)?;
        self.state.transport.store(Transport::Playing);
        Ok(())
    }

    /// Alias of [`play()`](Self::play).
    pub fn start(&self) -> Result<()> {
        self.play()
    }

    /// Halts playback and resets the position to 0. Idempotent.
    pub fn stop(&self) {
        self.state.transport.store(Transport::Stopped);
        self.state.position.store(0.0);
    }

    /// Suspends playback, freezing the position. The rate is untouched;
    /// [`play()`](Self::play) resumes from the frozen offset. A no-op unless
    /// currently playing.
    pub fn pause(&self) {
        if self.state.transport.load() == Transport::Playing {
            self.state.transport.store(Transport::Paused);
        }
    }

    // --- Parameters ---

    /// Enables or disables looping. Takes effect at the next block.
    pub fn set_loop(&self, enable: bool) {
        self.state
            .looping
            .store(enable, std::sync::atomic::Ordering::Relaxed);
    }

    /// Sets the loop region: it starts at `start_secs` and runs for
    /// `duration_secs`. Both must be finite, `start_secs >= 0` and
    /// `duration_secs > 0`. The region is clamped to the buffer at render
    /// time; regions shorter than one frame fall back to the whole buffer.
    pub fn loop_points(&self, start_secs: f64, duration_secs: f64) -> Result<()> {
        if !start_secs.is_finite() || start_secs < 0.0 {
            return Err(Error::UnsupportedParameter(format!(
                "loop start must be finite and non-negative, got {start_secs}"
            )));
        }
        if !duration_secs.is_finite() || duration_secs <= 0.0 {
            return Err(Error::UnsupportedParameter(format!(
                "loop duration must be finite and positive, got {duration_secs}"
            )));
        }
        self.state.loop_start.store(start_secs);
        self.state.loop_end.store(start_secs + duration_secs);
        Ok(())
    }

    /// Sets the output level as linear amplitude in `[0, 1]`.
    ///
    /// Stored as decibels internally; 0.0 maps to the silence floor rather
    /// than negative infinity. Out-of-range input is clamped.
    pub fn amp(&self, linear: f32) {
        self.state.gain_db.store(crate::math::amp_to_db(linear));
    }

    /// Sets the playback rate. Negative plays in reverse; 0.0 holds
    /// position. Applied continuously, so the value survives restarts.
    pub fn rate(&self, rate: f32) {
        self.state.rate.store(rate);
    }

    /// Seeks to `secs`, clamped to the buffer, without changing transport
    /// state. While paused this moves the frozen position.
    pub fn jump(&self, secs: f64) -> Result<()> {
        let buffer = self.state.buffer().ok_or(Error::NotReady)?;
        let clamped = secs.clamp(0.0, buffer.duration_secs());
        self.state
            .position
            .store(clamped * f64::from(buffer.sample_rate()));
        Ok(())
    }

    /// Registers the ended callback, replacing any previous one. It fires
    /// exactly once per natural (non-looping) end of the buffer, from the
    /// thread driving [`AudioContext::render`], outside the graph lock.
    pub fn on_ended<F>(&self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        let mut slot = self
            .state
            .on_ended
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *slot = Some(Box::new(callback));
    }

    // --- Queries ---

    /// Current playhead in seconds. 0.0 until a buffer is loaded.
    pub fn current_time(&self) -> f64 {
        match self.state.buffer() {
            Some(buffer) if buffer.sample_rate() > 0 => {
                self.state.position.load() / f64::from(buffer.sample_rate())
            }
            _ => 0.0,
        }
    }

    /// Buffer duration in seconds.
    pub fn duration(&self) -> Result<f64> {
        Ok(self.buffer()?.duration_secs())
    }

    /// Sample rate of the loaded buffer, in Hz.
    pub fn sample_rate(&self) -> Result<u32> {
        Ok(self.buffer()?.sample_rate())
    }

    /// Channel count of the loaded buffer.
    pub fn channels(&self) -> Result<u16> {
        Ok(self.buffer()?.channels())
    }

    /// Frame count of the loaded buffer.
    pub fn frames(&self) -> Result<usize> {
        Ok(self.buffer()?.frames())
    }

    /// Whether the transport is currently playing.
    pub fn is_playing(&self) -> bool {
        self.state.transport.load() == Transport::Playing
    }

    /// Whether looping is enabled.
    pub fn is_looping(&self) -> bool {
        self.state
            .looping
            .load(std::sync::atomic::Ordering::Relaxed)
    }

    /// Whether the buffer has been installed.
    pub fn is_loaded(&self) -> bool {
        self.state.buffer().is_some()
    }

    /// Removes the node from the graph. Equivalent to dropping it.
    pub fn release(self) {}

    fn buffer(&self) -> Result<&Arc<AudioBuffer>> {
        self.state.buffer().ok_or(Error::NotReady)
    }
}

impl AudioNode for SoundFile {
    fn handle(&self) -> NodeHandle {
        self.handle
    }

    fn context(&self) -> &AudioContext {
        &self.ctx
    }
}

impl Drop for SoundFile {
    fn drop(&mut self) {
        self.ctx.release(self.handle);
    }
}

/// Clonable, sendable installer for a [`SoundFile`]'s buffer.
///
/// The asynchronous loader moves one of these into its decode thread and
/// installs the buffer on completion. Installing twice fails with
/// [`Error::AlreadyLoaded`].
#[derive(Clone)]
pub struct BufferSlot {
    state: Arc<PlayerState>,
}

impl BufferSlot {
    /// Installs the decoded buffer.
    pub fn install(&self, buffer: AudioBuffer) -> Result<()> {
        self.state.install_buffer(Arc::new(buffer))
    }
}
