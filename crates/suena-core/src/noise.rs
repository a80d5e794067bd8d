//! Noise generator node.
//!
//! An infinite source in one of three colors. White noise comes from a
//! xorshift PRNG; pink runs it through the Kellett filter bank; brown is a
//! leaky integrator over white. Color, level, and the running flag are
//! shared with the voice through atomic cells, so all three can change while
//! the generator runs.

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};

use crate::context::AudioContext;
use crate::control::AtomicF32;
use crate::error::{Error, Result};
use crate::graph::NodeHandle;
use crate::node::AudioNode;
use crate::param::SmoothedGain;
use crate::source::Source;

/// Spectral color of the generated noise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum NoiseColor {
    /// Flat spectrum.
    #[default]
    White = 0,
    /// 1/f spectrum (equal energy per octave).
    Pink = 1,
    /// 1/f² spectrum (integrated white).
    Brown = 2,
}

impl NoiseColor {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Pink,
            2 => Self::Brown,
            _ => Self::White,
        }
    }
}

impl FromStr for NoiseColor {
    type Err = Error;

    /// Parses `"white"`, `"pink"`, or `"brown"` (case-insensitive).
    /// Anything else is [`Error::UnsupportedParameter`].
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "white" => Ok(Self::White),
            "pink" => Ok(Self::Pink),
            "brown" => Ok(Self::Brown),
            _ => Err(Error::UnsupportedParameter(format!(
                "unknown noise color {s:?}"
            ))),
        }
    }
}

/// Shared state between a [`Noise`] façade and its voice.
struct NoiseState {
    running: AtomicBool,
    gain_db: AtomicF32,
    color: AtomicU8,
}

/// The render-graph voice behind a [`Noise`] node.
struct NoiseVoice {
    state: Arc<NoiseState>,
    gain: SmoothedGain,
    was_running: bool,
    rng: u32,
    /// Kellett pink filter bank state.
    pink: [f32; 7],
    /// Brown noise integrator state.
    brown: f32,
}

impl NoiseVoice {
    fn new(state: Arc<NoiseState>, engine_rate: f32) -> Self {
        let gain = SmoothedGain::new(
            crate::math::db_to_linear(state.gain_db.load()),
            engine_rate,
        );
        Self {
            state,
            gain,
            was_running: false,
            rng: 0x1234_5678,
            pink: [0.0; 7],
            brown: 0.0,
        }
    }

    #[inline]
    fn next_white(&mut self) -> f32 {
        let mut x = self.rng;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.rng = x;
        (x as f32 / u32::MAX as f32) * 2.0 - 1.0
    }

    #[inline]
    fn next_pink(&mut self) -> f32 {
        let w = self.next_white();
        let b = &mut self.pink;
        b[0] = 0.99886 * b[0] + w * 0.055_517_9;
        b[1] = 0.99332 * b[1] + w * 0.075_075_9;
        b[2] = 0.96900 * b[2] + w * 0.153_852_0;
        b[3] = 0.86650 * b[3] + w * 0.310_485_6;
        b[4] = 0.55000 * b[4] + w * 0.532_952_2;
        b[5] = -0.7616 * b[5] - w * 0.016_898_0;
        let pink = (b.iter().sum::<f32>() + w * 0.5362) * 0.11;
        b[6] = w * 0.115_926;
        pink
    }

    #[inline]
    fn next_brown(&mut self) -> f32 {
        let w = self.next_white();
        self.brown = (self.brown + 0.02 * w) / 1.02;
        self.brown * 3.5
    }
}

impl Source for NoiseVoice {
    fn render(&mut self, out: &mut [f32]) {
        if !self.state.running.load(Ordering::Relaxed) {
            out.fill(0.0);
            self.was_running = false;
            return;
        }
        self.gain
            .set_target(crate::math::db_to_linear(self.state.gain_db.load()));
        if !self.was_running {
            self.gain.snap_to_target();
        }
        self.was_running = true;

        let color = NoiseColor::from_u8(self.state.color.load(Ordering::Relaxed));
        for slot in out.iter_mut() {
            let sample = match color {
                NoiseColor::White => self.next_white(),
                NoiseColor::Pink => self.next_pink(),
                NoiseColor::Brown => self.next_brown(),
            };
            *slot = sample * self.gain.advance();
        }
    }

    fn is_active(&self) -> bool {
        self.state.running.load(Ordering::Relaxed)
    }
}

/// An infinite noise generator node.
///
/// Starts and stops immediately, with no fade. Wired to the destination on
/// creation; dropping the node removes it from the graph.
pub struct Noise {
    ctx: AudioContext,
    handle: NodeHandle,
    state: Arc<NoiseState>,
}

impl Noise {
    /// Creates a white noise generator, initially stopped.
    pub fn new(ctx: &AudioContext) -> Self {
        Self::with_color(ctx, NoiseColor::White)
    }

    /// Creates a generator of the given color, initially stopped.
    pub fn with_color(ctx: &AudioContext, color: NoiseColor) -> Self {
        let state = Arc::new(NoiseState {
            running: AtomicBool::new(false),
            gain_db: AtomicF32::new(0.0),
            color: AtomicU8::new(color as u8),
        });
        let voice = NoiseVoice::new(Arc::clone(&state), ctx.sample_rate());
        let handle = ctx.graph().add_source(Box::new(voice));
        Self {
            ctx: ctx.clone(),
            handle,
            state,
        }
    }

    /// Switches the noise color. Takes effect at the next block, while
    /// running or not.
    pub fn set_color(&self, color: NoiseColor) {
        self.state.color.store(color as u8, Ordering::Relaxed);
    }

    /// The current color.
    pub fn color(&self) -> NoiseColor {
        NoiseColor::from_u8(self.state.color.load(Ordering::Relaxed))
    }

    /// Begins generating. Immediate; idempotent.
    pub fn start(&self) {
        self.state.running.store(true, Ordering::Relaxed);
    }

    /// Stops generating. Immediate; idempotent.
    pub fn stop(&self) {
        self.state.running.store(false, Ordering::Relaxed);
    }

    /// Whether the generator is running.
    pub fn is_running(&self) -> bool {
        self.state.running.load(Ordering::Relaxed)
    }

    /// Sets the output level as linear amplitude in `[0, 1]`, same
    /// convention as [`SoundFile::amp`](crate::SoundFile::amp).
    pub fn amp(&self, linear: f32) {
        self.state.gain_db.store(crate::math::amp_to_db(linear));
    }

    /// Removes the node from the graph. Equivalent to dropping it.
    pub fn release(self) {}
}

impl AudioNode for Noise {
    fn handle(&self) -> NodeHandle {
        self.handle
    }

    fn context(&self) -> &AudioContext {
        &self.ctx
    }
}

impl Drop for Noise {
    fn drop(&mut self) {
        self.ctx.release(self.handle);
    }
}
