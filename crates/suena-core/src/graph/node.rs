//! Node types for the render graph.
//!
//! Each node has a [`NodeHandle`] and a [`NodeKind`] that determines its role:
//! producing signal, capturing it for analysis, or terminating the graph at
//! the master output. `NodeData` bundles the kind with adjacency bookkeeping.

use std::sync::Arc;

use crate::source::Source;
use crate::tap::TapSink;

/// Unique identifier for a node in the render graph.
///
/// Handles are assigned sequentially and never reused within a graph
/// instance, so a stale handle from a released node can never alias a newer
/// one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeHandle(pub(crate) u32);

impl NodeHandle {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeHandle({})", self.0)
    }
}

/// The role of a node in the render graph.
pub enum NodeKind {
    /// Produces signal, one block at a time.
    Source(Box<dyn Source + Send>),
    /// Sums its inputs and captures the result into a [`TapSink`].
    Tap {
        /// Where captured blocks go.
        sink: Arc<TapSink>,
        /// Per-block summing accumulator, sized lazily to the block length.
        accum: Vec<f32>,
    },
    /// The master output. Exactly one per graph, created with it.
    Destination,
}

/// Internal bookkeeping for a node in the graph.
pub(crate) struct NodeData {
    pub kind: NodeKind,
    /// Edges arriving at this node.
    pub incoming: Vec<super::edge::EdgeId>,
    /// Edges leaving this node.
    pub outgoing: Vec<super::edge::EdgeId>,
}

impl NodeData {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        }
    }
}
