//! FFT wrapper with windowing.

use std::f32::consts::PI;
use std::sync::Arc;

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

/// Window function applied before the transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Window {
    /// Rectangular (no windowing).
    Rectangular,
    /// Hann window (raised cosine).
    #[default]
    Hann,
}

impl Window {
    /// Apply the window to a buffer in place.
    pub fn apply(&self, buffer: &mut [f32]) {
        match self {
            Window::Rectangular => {}
            Window::Hann => {
                let n = buffer.len();
                for (i, sample) in buffer.iter_mut().enumerate() {
                    let w = 0.5 * (1.0 - (2.0 * PI * i as f32 / n as f32).cos());
                    *sample *= w;
                }
            }
        }
    }

    /// Mean of the window coefficients. Divides out of magnitude
    /// normalization so a full-scale sine peaks near 1.0 regardless of
    /// window choice.
    pub fn coherent_gain(&self) -> f32 {
        match self {
            Window::Rectangular => 1.0,
            Window::Hann => 0.5,
        }
    }
}

/// Forward FFT with a cached plan and reusable scratch.
pub struct Fft {
    fft: Arc<dyn rustfft::Fft<f32>>,
    size: usize,
    scratch: Vec<Complex<f32>>,
}

impl Fft {
    /// Create a processor for the given transform size.
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        Self {
            fft,
            size,
            scratch: vec![Complex::new(0.0, 0.0); size],
        }
    }

    /// Transform size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Transform `input` and write bin magnitudes into `out`.
    ///
    /// Only positive frequencies are produced: `out` receives
    /// `min(out.len(), size / 2)` values. Input shorter than the transform
    /// size is zero-padded.
    pub fn magnitudes(&mut self, input: &[f32], out: &mut [f32]) {
        for (slot, &x) in self.scratch.iter_mut().zip(input.iter()) {
            *slot = Complex::new(x, 0.0);
        }
        for slot in self.scratch.iter_mut().skip(input.len()) {
            *slot = Complex::new(0.0, 0.0);
        }
        self.fft.process(&mut self.scratch);

        let bins = out.len().min(self.size / 2);
        for (slot, c) in out[..bins].iter_mut().zip(self.scratch.iter()) {
            *slot = c.norm();
        }
        out[bins..].fill(0.0);
    }
}
