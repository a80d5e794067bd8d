//! The spectral analyzer node.

use std::sync::Arc;

use suena_core::{AudioContext, AudioNode, Error, NodeHandle, Result, TapSink};

use crate::fft::{Fft, Window};

/// Default transform size when none is given.
pub const DEFAULT_FFT_SIZE: usize = 32;

/// A tap node computing magnitude spectra and waveforms of its summed input.
///
/// Upstream sources `connect` to the analyzer like any other node; everything
/// arriving at it is summed per block and captured into a ring of the most
/// recent `fft_size` samples. Both views are pull-based reads of that ring:
/// [`analyze()`](Self::analyze) windows and transforms it,
/// [`waveform()`](Self::waveform) returns it raw. Since they read the same
/// capture, both observe the identical upstream signal.
///
/// The analyzer does not forward audio; routing to the destination stays the
/// sources' own concern. Dropping it removes the tap from the graph.
pub struct SpectralAnalyzer {
    ctx: AudioContext,
    handle: NodeHandle,
    sink: Arc<TapSink>,
    fft: Fft,
    window: Window,
    fft_size: usize,
    /// Time-domain scratch, `fft_size` long.
    time: Vec<f32>,
}

impl SpectralAnalyzer {
    /// Creates an analyzer with the default transform size.
    pub fn new(ctx: &AudioContext) -> Self {
        // The default size is a valid power of two.
        match Self::with_size(ctx, DEFAULT_FFT_SIZE) {
            Ok(analyzer) => analyzer,
            Err(_) => unreachable!(),
        }
    }

    /// Creates an analyzer with the given transform size.
    ///
    /// `fft_size` must be a power of two and at least 2; anything else is
    /// rejected up front with [`Error::UnsupportedParameter`].
    pub fn with_size(ctx: &AudioContext, fft_size: usize) -> Result<Self> {
        if fft_size < 2 || !fft_size.is_power_of_two() {
            return Err(Error::UnsupportedParameter(format!(
                "fft size must be a power of two >= 2, got {fft_size}"
            )));
        }
        let sink = Arc::new(TapSink::new(fft_size));
        let handle = ctx.add_tap(Arc::clone(&sink));
        Ok(Self {
            ctx: ctx.clone(),
            handle,
            sink,
            fft: Fft::new(fft_size),
            window: Window::Hann,
            fft_size,
            time: vec![0.0; fft_size],
        })
    }

    /// Transform size.
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Computes the magnitude spectrum of the most recent `fft_size`
    /// samples.
    ///
    /// Returns exactly `fft_size / 2` values (DC up to just below Nyquist),
    /// Hann-windowed and normalized so a full-scale sine peaks near 1.0;
    /// every value is clamped to `[0, 1]`. Silence yields all zeros.
    pub fn analyze(&mut self) -> Vec<f32> {
        self.sink.latest(&mut self.time);
        self.window.apply(&mut self.time);

        let mut out = vec![0.0f32; self.fft_size / 2];
        self.fft.magnitudes(&self.time, &mut out);

        let scale = 2.0 / (self.fft_size as f32 * self.window.coherent_gain());
        for m in &mut out {
            *m = (*m * scale).clamp(0.0, 1.0);
        }
        out
    }

    /// Returns the most recent `fft_size` time-domain samples, oldest first.
    pub fn waveform(&self) -> Vec<f32> {
        let mut out = vec![0.0f32; self.fft_size];
        self.sink.latest(&mut out);
        out
    }

    /// Removes the tap from the graph. Equivalent to dropping it.
    pub fn release(self) {}
}

impl AudioNode for SpectralAnalyzer {
    fn handle(&self) -> NodeHandle {
        self.handle
    }

    fn context(&self) -> &AudioContext {
        &self.ctx
    }
}

impl Drop for SpectralAnalyzer {
    fn drop(&mut self) {
        self.ctx.release(self.handle);
    }
}
