//! Render graph for the suena engine.
//!
//! Nodes come in three kinds: sources (players, generators), taps (analysis
//! capture points), and the single destination created with the graph. Edges
//! are explicit; fan-out means several outgoing edges from one source. New
//! sources are auto-wired to the destination so they are audible without any
//! routing calls.
//!
//! The graph is owned by [`AudioContext`](crate::AudioContext) behind a
//! mutex: whoever drives rendering locks it per block, and topology mutations
//! take the same lock, so the render loop never observes a half-applied
//! change.

pub mod edge;
pub mod node;
mod render;

pub use edge::EdgeId;
pub use node::{NodeHandle, NodeKind};
pub use render::RenderGraph;
