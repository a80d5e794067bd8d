//! The polymorphic node interface.

use crate::context::AudioContext;
use crate::error::Result;
use crate::graph::NodeHandle;

/// Common surface of every façade node.
///
/// A node owns exactly one graph handle for its lifetime. Routing goes
/// through the default `connect`/`disconnect` implementations; concrete
/// nodes only supply their handle and context.
pub trait AudioNode {
    /// The node's handle in the render graph.
    fn handle(&self) -> NodeHandle;

    /// The context whose graph the node lives in.
    fn context(&self) -> &AudioContext;

    /// Adds an edge from this node to `destination`.
    ///
    /// Fan-out, not replace: existing edges are untouched. Fails with
    /// [`Error::InvalidConnection`](crate::Error::InvalidConnection) when the
    /// destination has been released, and
    /// [`Error::DuplicateEdge`](crate::Error::DuplicateEdge) when an
    /// identical edge already exists; either way the graph is unchanged.
    fn connect(&self, destination: &dyn AudioNode) -> Result<()> {
        self.context().connect(self.handle(), destination.handle())
    }

    /// Removes every outgoing edge of this node, the default edge to the
    /// destination included. A no-op on an already-disconnected node.
    fn disconnect(&self) {
        self.context().disconnect_all(self.handle());
    }
}
