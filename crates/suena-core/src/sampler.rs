//! Buffer playback voice and its shared control block.
//!
//! A [`SoundFile`](crate::SoundFile) façade and its [`SamplerVoice`] inside
//! the graph share one [`PlayerState`]: the façade writes parameters into
//! atomic cells, the voice reads them once per block. The buffer itself
//! arrives through a `OnceLock`, so an asynchronously loaded file can be
//! installed after the voice is already in the graph.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, OnceLock};

use crate::buffer::AudioBuffer;
use crate::control::{AtomicF32, AtomicF64, AtomicTransport, Transport};
use crate::error::{Error, Result};
use crate::param::SmoothedGain;
use crate::source::Source;

/// Callback invoked when playback reaches a natural end.
pub type EndedCallback = Box<dyn FnMut() + Send>;

/// Shared state between a playback façade and its render voice.
pub struct PlayerState {
    pub(crate) transport: AtomicTransport,
    /// Playback rate. Negative reverses; zero holds position.
    pub(crate) rate: AtomicF32,
    /// Gain in decibels. Set through a linear amplitude, stored as dB.
    pub(crate) gain_db: AtomicF32,
    pub(crate) looping: AtomicBool,
    /// Loop region in seconds. `loop_end` defaults to infinity, meaning the
    /// region is clamped to the full buffer at render time.
    pub(crate) loop_start: AtomicF64,
    pub(crate) loop_end: AtomicF64,
    /// Playhead in fractional frames of the source buffer.
    pub(crate) position: AtomicF64,
    /// Set by the voice on a natural end; cleared when the ended callback is
    /// dispatched.
    pub(crate) ended: AtomicBool,
    buffer: OnceLock<Arc<AudioBuffer>>,
    pub(crate) on_ended: Mutex<Option<EndedCallback>>,
}

impl PlayerState {
    /// Fresh state: stopped, rate 1.0, unity gain, loop over the full buffer.
    pub(crate) fn new() -> Self {
        Self {
            transport: AtomicTransport::new(Transport::Stopped),
            rate: AtomicF32::new(1.0),
            gain_db: AtomicF32::new(0.0),
            looping: AtomicBool::new(false),
            loop_start: AtomicF64::new(0.0),
            loop_end: AtomicF64::new(f64::INFINITY),
            position: AtomicF64::new(0.0),
            ended: AtomicBool::new(false),
            buffer: OnceLock::new(),
            on_ended: Mutex::new(None),
        }
    }

    /// The decoded buffer, if it has been installed yet.
    pub(crate) fn buffer(&self) -> Option<&Arc<AudioBuffer>> {
        self.buffer.get()
    }

    /// Install the decoded buffer. Fails if one is already present.
    pub(crate) fn install_buffer(&self, buffer: Arc<AudioBuffer>) -> Result<()> {
        self.buffer.set(buffer).map_err(|_| Error::AlreadyLoaded)
    }

    /// Take the ended flag, clearing it.
    pub(crate) fn take_ended(&self) -> bool {
        self.ended.swap(false, Ordering::Relaxed)
    }
}

/// The render-graph voice behind a [`SoundFile`](crate::SoundFile).
///
/// Advances a fractional frame position through the shared buffer with
/// linear interpolation, scaling the per-sample step by the ratio of buffer
/// to engine sample rate. Position lives in the shared state, so the façade
/// reads the true playhead rather than reconstructing it from wall clocks.
pub struct SamplerVoice {
    state: Arc<PlayerState>,
    gain: SmoothedGain,
    engine_rate: f32,
    was_playing: bool,
}

impl SamplerVoice {
    /// Create a voice reading from `state`, rendering at `engine_rate` Hz.
    pub(crate) fn new(state: Arc<PlayerState>, engine_rate: f32) -> Self {
        let gain = SmoothedGain::new(
            crate::math::db_to_linear(state.gain_db.load()),
            engine_rate,
        );
        Self {
            state,
            gain,
            engine_rate,
            was_playing: false,
        }
    }

    /// Loop region in frames, clamped to the buffer. Falls back to the full
    /// buffer when the stored region is degenerate: inverted, or shorter
    /// than one frame. Sub-frame spans would vanish in f64 rounding once the
    /// position is large, so wrapping over them cannot make progress.
    fn loop_region_frames(&self, buffer: &AudioBuffer) -> (f64, f64) {
        let frames = buffer.frames() as f64;
        let sr = f64::from(buffer.sample_rate());
        let start = (self.state.loop_start.load() * sr).clamp(0.0, frames);
        let end = (self.state.loop_end.load() * sr).min(frames);
        if end - start >= 1.0 {
            (start, end)
        } else {
            (0.0, frames)
        }
    }
}

impl Source for SamplerVoice {
    fn render(&mut self, out: &mut [f32]) {
        let playing = self.state.transport.load() == Transport::Playing;
        let Some(buffer) = self.state.buffer().cloned() else {
            out.fill(0.0);
            self.was_playing = false;
            return;
        };
        if !playing || buffer.frames() == 0 {
            out.fill(0.0);
            self.was_playing = false;
            return;
        }

        self.gain
            .set_target(crate::math::db_to_linear(self.state.gain_db.load()));
        if !self.was_playing {
            self.gain.snap_to_target();
        }
        self.was_playing = true;

        let rate = self.state.rate.load();
        let mut step =
            f64::from(rate) * f64::from(buffer.sample_rate()) / f64::from(self.engine_rate);
        if !step.is_finite() {
            step = 0.0;
        }

        let frames = buffer.frames() as f64;
        let looping = self.state.looping.load(Ordering::Relaxed);
        let (loop_start, loop_end) = self.loop_region_frames(&buffer);
        let span = loop_end - loop_start;

        let mut pos = self.state.position.load();
        for i in 0..out.len() {
            if looping && span > 0.0 {
                // Wrap in both directions in one step, however far outside
                // the region the position has drifted.
                if pos < loop_start || pos >= loop_end {
                    pos = loop_start + (pos - loop_start).rem_euclid(span);
                }
            } else if pos < 0.0 || pos >= frames {
                // Natural end: reverse playback past frame 0 ends exactly
                // like forward playback past the last frame.
                self.state.transport.store(Transport::Stopped);
                self.state.position.store(0.0);
                self.state.ended.store(true, Ordering::Relaxed);
                self.was_playing = false;
                out[i..].fill(0.0);
                return;
            }

            let base = pos.floor();
            let frac = (pos - base) as f32;
            let idx = base as usize;
            let a = buffer.frame_mono(idx);
            let b = if (idx + 1) as f64 >= frames {
                a
            } else {
                buffer.frame_mono(idx + 1)
            };
            out[i] = (a + (b - a) * frac) * self.gain.advance();
            pos += step;
        }
        self.state.position.store(pos);
    }

    fn is_active(&self) -> bool {
        self.state.transport.load() == Transport::Playing
    }
}
