//! Error types shared across the suena core.

use crate::graph::NodeHandle;

/// Errors raised by graph operations and node controls.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A buffer-backed operation was attempted before the buffer finished
    /// loading. Metadata queries and `play()` return this until the decode
    /// completes; polling callers can treat it as "not available yet".
    #[error("audio buffer is not loaded yet")]
    NotReady,

    /// `connect()` was called with a destination that has no valid handle
    /// in the graph. Existing edges are untouched.
    #[error("invalid connection: {0}")]
    InvalidConnection(String),

    /// A parameter value outside the recognized set (noise color, FFT size,
    /// loop bounds). Validated eagerly rather than forwarded.
    #[error("unsupported parameter: {0}")]
    UnsupportedParameter(String),

    /// The specified node was not found in the graph.
    #[error("node {0} not found")]
    NodeNotFound(NodeHandle),

    /// An identical edge already exists between these nodes.
    #[error("edge from {0} to {1} already exists")]
    DuplicateEdge(NodeHandle, NodeHandle),

    /// A buffer was installed into a node that already has one.
    #[error("audio buffer is already loaded")]
    AlreadyLoaded,
}

/// Convenience result type for core operations.
pub type Result<T> = std::result::Result<T, Error>;
