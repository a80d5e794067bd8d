//! Render graph mutation API and block execution.
//!
//! [`RenderGraph`] owns the topology (nodes and edges), provides mutation
//! methods (add, connect, disconnect, remove), and renders audio one block at
//! a time. The graph is mutated and rendered under the same lock (held by
//! [`AudioContext`](crate::AudioContext)), so topology changes are atomic
//! with respect to block boundaries.
//!
//! Signal flow is one hop deep: sources render into scratch, their blocks are
//! summed into each outgoing edge's target (the destination accumulator or a
//! tap accumulator), and taps then capture their summed input. There is no
//! schedule compilation because no node both consumes and produces.

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::source::Source;
use crate::tap::TapSink;

use super::edge::{Edge, EdgeId};
use super::node::{NodeData, NodeHandle, NodeKind};

/// Directed render graph of sources, taps, and one destination.
///
/// Nodes and edges live in slab vectors indexed by their sequential IDs;
/// removal leaves a `None` slot so handles are never reused.
pub struct RenderGraph {
    nodes: Vec<Option<NodeData>>,
    edges: Vec<Option<Edge>>,
    next_node_slot: u32,
    next_edge_slot: u32,
    destination: NodeHandle,
    sample_rate: f32,
    /// Per-block source output, reused across blocks.
    scratch: Vec<f32>,
}

impl RenderGraph {
    /// Creates an empty graph with its destination node in place.
    pub fn new(sample_rate: f32) -> Self {
        let mut graph = Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            next_node_slot: 0,
            next_edge_slot: 0,
            destination: NodeHandle(0),
            sample_rate,
            scratch: Vec::new(),
        };
        graph.destination = graph.add_node(NodeKind::Destination);
        graph
    }

    /// Sample rate the graph renders at, in Hz.
    #[inline]
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Handle of the master output node.
    #[inline]
    pub fn destination(&self) -> NodeHandle {
        self.destination
    }

    // --- Node mutations ---

    /// Adds a source node and wires it to the destination.
    ///
    /// The default edge to the master mix is what makes a freshly created
    /// node audible; `disconnect_all` removes it like any other edge.
    pub fn add_source(&mut self, source: Box<dyn Source + Send>) -> NodeHandle {
        let id = self.add_node(NodeKind::Source(source));
        // Fresh source, existing destination: this connect cannot fail.
        let _ = self.connect(id, self.destination);
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_add: source node {id}");
        id
    }

    /// Adds a tap node capturing into `sink`. Returns the new node's handle.
    ///
    /// Taps are pure consumers; upstream nodes connect *to* them.
    pub fn add_tap(&mut self, sink: Arc<TapSink>) -> NodeHandle {
        let id = self.add_node(NodeKind::Tap {
            sink,
            accum: Vec::new(),
        });
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_add: tap node {id}");
        id
    }

    /// Removes a node and all its touching edges.
    ///
    /// Returns an error if the node doesn't exist. The destination cannot be
    /// removed.
    pub fn remove_node(&mut self, id: NodeHandle) -> Result<()> {
        if id == self.destination {
            return Err(Error::InvalidConnection(
                "the destination node cannot be removed".into(),
            ));
        }
        let idx = id.0 as usize;
        let node = self
            .nodes
            .get(idx)
            .and_then(|n| n.as_ref())
            .ok_or(Error::NodeNotFound(id))?;

        // Collect edge IDs first to avoid a borrow conflict.
        let edge_ids: Vec<EdgeId> = node
            .incoming
            .iter()
            .chain(node.outgoing.iter())
            .copied()
            .collect();

        for edge_id in edge_ids {
            self.remove_edge(edge_id);
        }

        self.nodes[idx] = None;
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_remove: node {id}");
        Ok(())
    }

    /// Connects two nodes with a directed edge.
    ///
    /// Returns the new edge's ID, or an error if:
    /// - Either node doesn't exist
    /// - An identical edge already exists
    /// - The connection is structurally invalid (edge into a source, edge
    ///   out of a tap or the destination, self-loop)
    ///
    /// On any error the existing topology is untouched.
    pub fn connect(&mut self, from: NodeHandle, to: NodeHandle) -> Result<EdgeId> {
        self.get_node(from)?;
        self.get_node(to)?;
        self.validate_connection(from, to)?;

        if self.has_edge(from, to) {
            return Err(Error::DuplicateEdge(from, to));
        }

        let edge_id = EdgeId(self.next_edge_slot);
        self.next_edge_slot += 1;

        let edge_idx = edge_id.0 as usize;
        if edge_idx >= self.edges.len() {
            self.edges.resize_with(edge_idx + 1, || None);
        }
        self.edges[edge_idx] = Some(Edge { from, to });

        if let Some(node) = self.nodes[from.0 as usize].as_mut() {
            node.outgoing.push(edge_id);
        }
        if let Some(node) = self.nodes[to.0 as usize].as_mut() {
            node.incoming.push(edge_id);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!("graph_connect: {from} -> {to}");
        Ok(edge_id)
    }

    /// Removes every outgoing edge of a node.
    ///
    /// Idempotent: calling it on a node with no outgoing edges, or on a
    /// handle that is no longer in the graph, does nothing.
    pub fn disconnect_all(&mut self, from: NodeHandle) {
        let Some(Some(node)) = self.nodes.get(from.0 as usize) else {
            return;
        };
        let edge_ids: Vec<EdgeId> = node.outgoing.clone();
        for edge_id in edge_ids {
            self.remove_edge(edge_id);
        }
        #[cfg(feature = "tracing")]
        tracing::debug!("graph_disconnect: all edges out of {from}");
    }

    // --- Introspection ---

    /// Whether a handle refers to a live node.
    pub fn has_node(&self, id: NodeHandle) -> bool {
        matches!(self.nodes.get(id.0 as usize), Some(Some(_)))
    }

    /// Number of live nodes, destination included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Number of live edges.
    pub fn edge_count(&self) -> usize {
        self.edges.iter().filter(|e| e.is_some()).count()
    }

    /// Number of outgoing edges of a node; 0 for unknown handles.
    pub fn outgoing_count(&self, id: NodeHandle) -> usize {
        self.nodes
            .get(id.0 as usize)
            .and_then(|n| n.as_ref())
            .map_or(0, |n| n.outgoing.len())
    }

    // --- Rendering ---

    /// Renders one block of the master mix into `out`.
    ///
    /// Every source renders exactly once; its block is accumulated into each
    /// outgoing edge's target. Taps capture their summed input afterwards, so
    /// an analyzer sees the same block regardless of source iteration order.
    pub fn render_block(&mut self, out: &mut [f32]) {
        out.fill(0.0);
        if self.scratch.len() != out.len() {
            self.scratch.resize(out.len(), 0.0);
        }
        for slot in &mut self.nodes {
            if let Some(node) = slot
                && let NodeKind::Tap { accum, .. } = &mut node.kind
            {
                accum.clear();
                accum.resize(out.len(), 0.0);
            }
        }

        for idx in 0..self.nodes.len() {
            let Some(mut node) = self.nodes[idx].take() else {
                continue;
            };
            if let NodeKind::Source(source) = &mut node.kind {
                let mut scratch = std::mem::take(&mut self.scratch);
                source.render(&mut scratch);
                for &edge_id in &node.outgoing {
                    let Some(edge) = self
                        .edges
                        .get(edge_id.0 as usize)
                        .and_then(|e| e.as_ref())
                    else {
                        continue;
                    };
                    if edge.to == self.destination {
                        for (acc, &s) in out.iter_mut().zip(scratch.iter()) {
                            *acc += s;
                        }
                    } else if let Some(Some(target)) = self.nodes.get_mut(edge.to.0 as usize)
                        && let NodeKind::Tap { accum, .. } = &mut target.kind
                    {
                        for (acc, &s) in accum.iter_mut().zip(scratch.iter()) {
                            *acc += s;
                        }
                    }
                }
                self.scratch = scratch;
            }
            self.nodes[idx] = Some(node);
        }

        for slot in &mut self.nodes {
            if let Some(node) = slot
                && let NodeKind::Tap { sink, accum } = &node.kind
            {
                sink.capture(accum);
            }
        }
    }

    // --- Internals ---

    fn add_node(&mut self, kind: NodeKind) -> NodeHandle {
        let id = NodeHandle(self.next_node_slot);
        self.next_node_slot += 1;
        let idx = id.0 as usize;
        if idx >= self.nodes.len() {
            self.nodes.resize_with(idx + 1, || None);
        }
        self.nodes[idx] = Some(NodeData::new(kind));
        id
    }

    fn get_node(&self, id: NodeHandle) -> Result<&NodeData> {
        self.nodes
            .get(id.0 as usize)
            .and_then(|n| n.as_ref())
            .ok_or(Error::NodeNotFound(id))
    }

    fn validate_connection(&self, from: NodeHandle, to: NodeHandle) -> Result<()> {
        if from == to {
            return Err(Error::InvalidConnection(format!(
                "node {from} cannot connect to itself"
            )));
        }
        match self.get_node(from)?.kind {
            NodeKind::Source(_) => {}
            NodeKind::Tap { .. } => {
                return Err(Error::InvalidConnection(format!(
                    "tap node {from} has no output"
                )));
            }
            NodeKind::Destination => {
                return Err(Error::InvalidConnection(
                    "the destination node has no output".into(),
                ));
            }
        }
        if matches!(self.get_node(to)?.kind, NodeKind::Source(_)) {
            return Err(Error::InvalidConnection(format!(
                "source node {to} accepts no input"
            )));
        }
        Ok(())
    }

    fn has_edge(&self, from: NodeHandle, to: NodeHandle) -> bool {
        self.nodes
            .get(from.0 as usize)
            .and_then(|n| n.as_ref())
            .is_some_and(|node| {
                node.outgoing.iter().any(|&e| {
                    self.edges
                        .get(e.0 as usize)
                        .and_then(|edge| edge.as_ref())
                        .is_some_and(|edge| edge.to == to)
                })
            })
    }

    fn remove_edge(&mut self, id: EdgeId) {
        let Some(edge) = self.edges.get_mut(id.0 as usize).and_then(Option::take) else {
            return;
        };
        if let Some(Some(node)) = self.nodes.get_mut(edge.from.0 as usize) {
            node.outgoing.retain(|&e| e != id);
        }
        if let Some(Some(node)) = self.nodes.get_mut(edge.to.0 as usize) {
            node.incoming.retain(|&e| e != id);
        }
    }
}
