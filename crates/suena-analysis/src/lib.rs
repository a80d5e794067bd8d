//! Spectral analysis for the suena audio engine.
//!
//! Provides [`SpectralAnalyzer`], a tap node that sums whatever is connected
//! to it and exposes two pull-based views of the captured signal: a
//! normalized magnitude spectrum and the raw time-domain waveform. The FFT
//! itself comes from `rustfft`; this crate only does windowing, bin
//! extraction, and normalization.
//!
//! # Example
//!
//! ```rust
//! use suena_analysis::SpectralAnalyzer;
//! use suena_core::{AudioContext, AudioNode, Noise};
//!
//! let ctx = AudioContext::new(48000.0);
//! let noise = Noise::new(&ctx);
//! let mut analyzer = SpectralAnalyzer::with_size(&ctx, 64).unwrap();
//! noise.connect(&analyzer).unwrap();
//! noise.start();
//!
//! let mut block = [0.0f32; 256];
//! ctx.render(&mut block);
//! let spectrum = analyzer.analyze();
//! assert_eq!(spectrum.len(), 32);
//! ```

pub mod analyzer;
pub mod fft;

pub use analyzer::{DEFAULT_FFT_SIZE, SpectralAnalyzer};
pub use fft::{Fft, Window};
