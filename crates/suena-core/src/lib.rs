//! Core of the suena audio engine.
//!
//! suena is a node-graph façade over a small real-time render engine: sound
//! files, noise generators, and analyzer taps are objects wired into a
//! signal graph, each one a handle-carrying [`AudioNode`]. This crate holds
//! the engine ([`RenderGraph`](graph::RenderGraph)), the shared
//! [`AudioContext`], and the playback and generator nodes; spectral analysis
//! and file I/O live in their own crates on top.
//!
//! # Example
//!
//! ```rust
//! use suena_core::{AudioBuffer, AudioContext, SoundFile};
//!
//! let ctx = AudioContext::new(48000.0);
//! let file = SoundFile::from_buffer(&ctx, AudioBuffer::new(vec![0.5; 480], 1, 48000));
//! file.amp(0.8);
//! file.play().unwrap();
//!
//! let mut block = [0.0f32; 256];
//! ctx.render(&mut block);
//! ```
//!
//! # Feature flags
//!
//! - `tracing`: emit graph mutation events through the `tracing` crate.

pub mod buffer;
pub mod context;
pub mod control;
pub mod error;
pub mod graph;
pub mod math;
pub mod node;
pub mod noise;
pub mod param;
pub mod sampler;
pub mod sound_file;
pub mod source;
pub mod tap;

pub use buffer::AudioBuffer;
pub use context::AudioContext;
pub use control::Transport;
pub use error::{Error, Result};
pub use graph::NodeHandle;
pub use node::AudioNode;
pub use noise::{Noise, NoiseColor};
pub use param::SmoothedGain;
pub use sound_file::{BufferSlot, SoundFile};
pub use source::Source;
pub use tap::TapSink;
