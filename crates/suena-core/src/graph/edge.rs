//! Edge types for the render graph.
//!
//! An `Edge` represents signal flow from a source node to a summing target.
//! Fan-out is expressed as multiple outgoing edges; each must be created by
//! an explicit `connect` call.

/// Unique identifier for an edge in the render graph.
///
/// Edge IDs are assigned sequentially and never reused within a graph
/// instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EdgeId(pub(crate) u32);

impl EdgeId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EdgeId({})", self.0)
    }
}

/// A directed connection between two nodes in the render graph.
pub(crate) struct Edge {
    /// Source node.
    pub from: super::node::NodeHandle,
    /// Summing target.
    pub to: super::node::NodeHandle,
}
