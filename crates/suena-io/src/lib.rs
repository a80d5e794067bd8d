//! Audio I/O for the suena audio engine.
//!
//! This crate provides:
//!
//! - **WAV decoding**: [`read_wav`] and [`write_wav`] for loading and saving
//!   sample data
//! - **Loading**: [`Loader`] creates [`SoundFile`](suena_core::SoundFile)
//!   nodes from disk, synchronously or on a background thread with a preload
//!   counter
//! - **Device output**: [`OutputStream`] drives an
//!   [`AudioContext`](suena_core::AudioContext) from the default output
//!   device
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use suena_core::AudioContext;
//! use suena_io::{Loader, OutputStream};
//!
//! let ctx = AudioContext::new(48000.0);
//! let loader = Loader::new(&ctx);
//! let song = loader.load("song.wav")?;
//! let _stream = OutputStream::open(&ctx)?;
//! song.play()?;
//! ```

mod loader;
mod stream;
mod wav;

pub use loader::Loader;
pub use stream::OutputStream;
pub use wav::{read_wav, write_wav};

/// Error types for audio I/O operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// WAV file read/write error.
    #[error("WAV file error: {0}")]
    Wav(#[from] hound::Error),

    /// Audio stream setup or runtime error.
    #[error("Audio stream error: {0}")]
    Stream(String),

    /// No audio output device available on the system.
    #[error("No audio device available")]
    NoDevice,

    /// The device's sample format is not supported.
    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    /// Engine-side error surfaced through the I/O layer.
    #[error(transparent)]
    Core(#[from] suena_core::Error),

    /// Standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type for audio I/O operations.
pub type Result<T> = std::result::Result<T, Error>;
